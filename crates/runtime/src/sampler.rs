//! Fixed-period forwarding of session snapshots to a listener.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, warn};

use crate::descriptor::{Listener, Session};

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Per-run recurring timer. The first sample fires one full period after spawn.
pub(crate) struct PeriodicSampler {
	halt: watch::Sender<bool>,
	task: JoinHandle<u64>,
}

impl PeriodicSampler {
	pub(crate) fn spawn<S: Session>(
		executor: &Handle,
		period: Duration,
		session: Arc<S>,
		listener: Listener<S::State>,
	) -> Self {
		let (halt, mut halt_rx) = watch::channel(false);
		// Periods too long to schedule never tick.
		let first = Instant::now()
			.checked_add(period)
			.unwrap_or_else(|| Instant::now() + FAR_FUTURE);

		let task = executor.spawn(async move {
			let mut ticker = interval_at(first, period);
			let mut samples = 0u64;
			loop {
				tokio::select! {
					biased;
					_ = halt_rx.wait_for(|halted| *halted) => break,
					_ = ticker.tick() => {
						listener(session.state());
						samples += 1;
					}
				}
			}
			samples
		});

		debug!(target = "bt.runtime", ?period, "periodic sampler started");
		Self { halt, task }
	}

	/// Stops the schedule and waits for the task to exit.
	///
	/// No sample is delivered once this returns. Yields the number of samples taken.
	pub(crate) async fn halt(self) -> u64 {
		self.halt.send_replace(true);
		match self.task.await {
			Ok(samples) => {
				debug!(target = "bt.runtime", samples, "periodic sampler halted");
				samples
			}
			Err(err) => {
				warn!(target = "bt.runtime", error = %err, "periodic sampler terminated abnormally");
				0
			}
		}
	}
}
