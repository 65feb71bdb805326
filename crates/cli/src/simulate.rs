//! A stand-in transfer used to exercise the runtime from the command line.
//!
//! The transfer "downloads" a fixed number of pieces at a constant rate and
//! finishes after its configured duration unless stopped earlier.

use std::time::Duration;

use bt_runtime::{ActivityFlag, ActivityWatch, DelegateError, Descriptor, Session};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Snapshot reported to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
	pub elapsed_ms: u64,
	pub pieces_done: u32,
	pub pieces_total: u32,
	pub active: bool,
}

#[derive(Default)]
struct Timeline {
	started_at: Option<Instant>,
	ended_at: Option<Instant>,
	finisher: Option<JoinHandle<()>>,
}

/// Simulated unit of work; acts as both descriptor and session.
pub struct SimulatedTransfer {
	activity: ActivityFlag,
	duration: Duration,
	pieces_total: u32,
	push: bool,
	timeline: Mutex<Timeline>,
}

impl SimulatedTransfer {
	/// `push` selects whether the runtime is notified through the activity
	/// flag or has to poll `is_active()`.
	pub fn new(duration: Duration, pieces_total: u32, push: bool) -> Self {
		Self {
			activity: ActivityFlag::new(),
			duration,
			pieces_total,
			push,
			timeline: Mutex::new(Timeline::default()),
		}
	}

	fn elapsed(&self, timeline: &Timeline) -> Duration {
		match timeline.started_at {
			Some(start) => timeline
				.ended_at
				.unwrap_or_else(Instant::now)
				.saturating_duration_since(start)
				.min(self.duration),
			None => Duration::ZERO,
		}
	}
}

impl Descriptor for SimulatedTransfer {
	fn is_active(&self) -> bool {
		self.activity.is_active()
	}

	fn start(&self) -> Result<(), DelegateError> {
		let executor = Handle::try_current()?;
		let mut timeline = self.timeline.lock();

		// Mark active before the finisher can possibly run.
		self.activity.set_active(true);
		let activity = self.activity.clone();
		let duration = self.duration;
		let finisher = executor.spawn(async move {
			tokio::time::sleep(duration).await;
			activity.set_active(false);
			debug!(target = "bt.cli", "simulated transfer finished");
		});

		*timeline = Timeline {
			started_at: Some(Instant::now()),
			ended_at: None,
			finisher: Some(finisher),
		};
		Ok(())
	}

	fn stop(&self) -> Result<(), DelegateError> {
		let mut timeline = self.timeline.lock();
		if let Some(finisher) = timeline.finisher.take() {
			finisher.abort();
		}
		if self.activity.is_active() {
			timeline.ended_at = Some(Instant::now());
		}
		self.activity.set_active(false);
		Ok(())
	}

	fn activity(&self) -> Option<ActivityWatch> {
		self.push.then(|| self.activity.subscribe())
	}
}

impl Session for SimulatedTransfer {
	type State = Progress;

	fn state(&self) -> Progress {
		let timeline = self.timeline.lock();
		let elapsed = self.elapsed(&timeline);
		let pieces_done = if self.duration.is_zero() {
			if timeline.started_at.is_some() { self.pieces_total } else { 0 }
		} else {
			(u128::from(self.pieces_total) * elapsed.as_nanos() / self.duration.as_nanos()) as u32
		};

		Progress {
			elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
			pieces_done,
			pieces_total: self.pieces_total,
			active: self.activity.is_active(),
		}
	}
}
