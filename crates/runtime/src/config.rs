//! Runtime tuning loaded from JSON or built in code.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Monitor behaviour for a [`SessionRuntime`](crate::SessionRuntime).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
	/// How often `is_active()` is polled for descriptors without an activity watch.
	#[serde(rename = "poll_interval_ms", with = "millis")]
	pub poll_interval: Duration,
	/// Auto-stop the delegate after this long. `None` runs until stopped.
	#[serde(rename = "deadline_ms", with = "opt_millis", skip_serializing_if = "Option::is_none")]
	pub deadline: Option<Duration>,
}

impl RuntimeConfig {
	pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

	pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
		serde_json::from_str(s)
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}

	pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
		self.deadline = deadline;
		self
	}
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			poll_interval: Self::DEFAULT_POLL_INTERVAL,
			deadline: None,
		}
	}
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn saturating_millis(value: Duration) -> u64 {
	u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}

mod millis {
	use super::*;

	pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u64(saturating_millis(*value))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		u64::deserialize(deserializer).map(Duration::from_millis)
	}
}

mod opt_millis {
	use super::*;

	pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
		match value {
			Some(d) => serializer.serialize_some(&saturating_millis(*d)),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
		Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
	}
}
