//! Runtime configuration from an optional JSON file plus flag overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use bt_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Request-scoped runtime overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeOverrides {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub poll_ms: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub deadline_ms: Option<u64>,
}

/// Loads the config file (if any) and applies overrides on top.
pub fn resolve_runtime_config(file: Option<&Path>, overrides: &RuntimeOverrides) -> Result<RuntimeConfig> {
	let mut config = match file {
		Some(path) => {
			let text = std::fs::read_to_string(path)
				.with_context(|| format!("failed to read runtime config {}", path.display()))?;
			RuntimeConfig::from_json_str(&text).map_err(|source| CliError::Config {
				path: path.to_path_buf(),
				source,
			})?
		}
		None => RuntimeConfig::default(),
	};

	if let Some(poll_ms) = overrides.poll_ms {
		if poll_ms == 0 {
			return Err(CliError::InvalidArgument("--poll-ms must be greater than zero".into()));
		}
		config.poll_interval = Duration::from_millis(poll_ms);
	}
	if let Some(deadline_ms) = overrides.deadline_ms {
		config.deadline = Some(Duration::from_millis(deadline_ms));
	}

	Ok(config)
}
