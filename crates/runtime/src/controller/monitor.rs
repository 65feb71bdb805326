//! Background task that waits for a run to end and completes it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::completion::{Completion, Resolution, Resolver};
use crate::descriptor::{ActivityWatch, Descriptor, Listener, Session};
use crate::sampler::PeriodicSampler;

pub(super) struct Monitor<D: Descriptor, S: Session> {
	pub(super) descriptor: Arc<D>,
	pub(super) session: Arc<S>,
	pub(super) activity: Option<ActivityWatch>,
	pub(super) listener: Option<Listener<S::State>>,
	pub(super) sampler: Option<PeriodicSampler>,
	pub(super) poll_interval: Duration,
	pub(super) deadline: Option<Duration>,
	pub(super) stop_rx: watch::Receiver<bool>,
	/// Keeps the stop channel open if the runtime is dropped mid-run.
	pub(super) _stop_tx: Arc<watch::Sender<bool>>,
}

impl<D: Descriptor, S: Session> Monitor<D, S> {
	/// Runs to completion. `resolver` is resolved last; if this future is
	/// dropped early the resolver's drop records an interruption instead.
	pub(super) async fn run(mut self, resolver: Resolver) {
		let completion = self.wait_for_end().await;
		debug!(target = "bt.runtime", ?completion, "run ending");

		if completion == Completion::DeadlineElapsed {
			if let Err(err) = self.descriptor.stop() {
				warn!(target = "bt.runtime", error = %err, "delegate failed to stop at deadline");
			}
		}

		if let Some(sampler) = self.sampler.take() {
			sampler.halt().await;
		}
		if let Some(listener) = &self.listener {
			listener(self.session.state());
		}

		resolver.resolve(Resolution::Completed(completion));
		info!(target = "bt.runtime", ?completion, "session completed");
	}

	async fn wait_for_end(&mut self) -> Completion {
		let deadline = self.deadline;
		let expiry = async move {
			match deadline {
				Some(after) => tokio::time::sleep(after).await,
				None => std::future::pending().await,
			}
		};
		tokio::pin!(expiry);

		let poll_interval = self.poll_interval;
		let stop_rx = &mut self.stop_rx;

		if let Some(mut activity) = self.activity.take() {
			// A closed activity channel means the descriptor dropped its flag.
			return tokio::select! {
				biased;
				_ = stop_rx.wait_for(|stop| *stop) => Completion::Stopped,
				_ = activity.wait_for(|active| !*active) => Completion::Finished,
				() = &mut expiry => Completion::DeadlineElapsed,
			};
		}

		loop {
			if !self.descriptor.is_active() {
				return Completion::Finished;
			}
			tokio::select! {
				biased;
				_ = stop_rx.wait_for(|stop| *stop) => return Completion::Stopped,
				() = &mut expiry => return Completion::DeadlineElapsed,
				() = tokio::time::sleep(poll_interval) => {}
			}
		}
	}
}
