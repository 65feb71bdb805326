//! The [`SessionRuntime`] start/stop state machine.
//!
//! Each call to `start_async` creates a run: a monitor task on the executor,
//! an optional [`PeriodicSampler`], and a [`CompletionHandle`]. Natural
//! completion, `stop()` and the deadline all converge on the monitor, which
//! halts the sampler, delivers the final snapshot and only then resolves the
//! handle.

mod monitor;
#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use self::monitor::Monitor;
use crate::completion::{CompletionHandle, Resolver};
use crate::config::RuntimeConfig;
use crate::descriptor::{Descriptor, Listener, Session};
use crate::error::{Error, Result};
use crate::sampler::PeriodicSampler;

/// Book-keeping for the most recent run.
struct ActiveRun {
	stop_tx: Arc<watch::Sender<bool>>,
	completion: CompletionHandle,
}

/// Drives one start/stop cycle of a [`Descriptor`] at a time.
pub struct SessionRuntime<D: Descriptor, S: Session> {
	descriptor: Arc<D>,
	session: Arc<S>,
	config: RuntimeConfig,
	executor: Handle,
	run: Mutex<Option<ActiveRun>>,
}

/// Builder for [`SessionRuntime`].
pub struct SessionRuntimeBuilder<D: Descriptor, S: Session> {
	descriptor: Arc<D>,
	session: Arc<S>,
	config: RuntimeConfig,
	executor: Option<Handle>,
}

impl<D: Descriptor, S: Session> SessionRuntimeBuilder<D, S> {
	pub fn config(mut self, config: RuntimeConfig) -> Self {
		self.config = config;
		self
	}

	/// Executor for the monitor and sampler tasks. Defaults to the current runtime.
	pub fn executor(mut self, executor: Handle) -> Self {
		self.executor = Some(executor);
		self
	}

	pub fn build(self) -> Result<SessionRuntime<D, S>> {
		if self.config.poll_interval.is_zero() {
			return Err(Error::InvalidConfig("poll interval must be non-zero".into()));
		}
		let executor = match self.executor {
			Some(executor) => executor,
			None => Handle::try_current().map_err(|err| Error::NoExecutor(err.to_string()))?,
		};

		Ok(SessionRuntime {
			descriptor: self.descriptor,
			session: self.session,
			config: self.config,
			executor,
			run: Mutex::new(None),
		})
	}
}

impl<D: Descriptor, S: Session> SessionRuntime<D, S> {
	pub fn builder(descriptor: impl Into<Arc<D>>, session: impl Into<Arc<S>>) -> SessionRuntimeBuilder<D, S> {
		SessionRuntimeBuilder {
			descriptor: descriptor.into(),
			session: session.into(),
			config: RuntimeConfig::default(),
			executor: None,
		}
	}

	/// Shorthand for a default-configured runtime on the current executor.
	pub fn new(descriptor: impl Into<Arc<D>>, session: impl Into<Arc<S>>) -> Result<Self> {
		Self::builder(descriptor, session).build()
	}

	/// Starts the delegate and begins monitoring it.
	///
	/// # Errors
	///
	/// - [`Error::AlreadyRunning`] if the delegate is active or the previous run
	///   has not completed yet. Nothing is started.
	/// - [`Error::DelegateStart`] if the delegate refuses to start.
	pub fn start_async(&self) -> Result<CompletionHandle> {
		self.launch(None)
	}

	/// Like [`start_async`](Self::start_async), additionally invoking `listener`
	/// with a fresh snapshot every `period` (first call after one period) and
	/// once more after the run ends.
	pub fn start_async_with_listener<F>(&self, listener: F, period: Duration) -> Result<CompletionHandle>
	where
		F: Fn(S::State) + Send + Sync + 'static,
	{
		if period.is_zero() {
			return Err(Error::InvalidPeriod);
		}
		let listener: Listener<S::State> = Arc::new(listener);
		self.launch(Some((listener, period)))
	}

	fn launch(&self, listener: Option<(Listener<S::State>, Duration)>) -> Result<CompletionHandle> {
		let mut run = self.run.lock();

		if self.descriptor.is_active() {
			return Err(Error::AlreadyRunning);
		}
		if run.as_ref().is_some_and(|previous| !previous.completion.is_resolved()) {
			return Err(Error::AlreadyRunning);
		}

		self.descriptor.start().map_err(Error::DelegateStart)?;

		let (resolver, completion) = Resolver::new();
		let (stop_tx, stop_rx) = watch::channel(false);
		let stop_tx = Arc::new(stop_tx);

		let (listener, sampler) = match listener {
			Some((listener, period)) => {
				let sampler =
					PeriodicSampler::spawn(&self.executor, period, Arc::clone(&self.session), Arc::clone(&listener));
				(Some(listener), Some(sampler))
			}
			None => (None, None),
		};
		let sampled = sampler.is_some();

		let monitor = Monitor {
			descriptor: Arc::clone(&self.descriptor),
			session: Arc::clone(&self.session),
			activity: self.descriptor.activity(),
			listener,
			sampler,
			poll_interval: self.config.poll_interval,
			deadline: self.config.deadline,
			stop_rx,
			_stop_tx: Arc::clone(&stop_tx),
		};
		self.executor.spawn(monitor.run(resolver));

		info!(
			target = "bt.runtime",
			sampled,
			deadline = ?self.config.deadline,
			"session started"
		);

		*run = Some(ActiveRun {
			stop_tx,
			completion: completion.clone(),
		});
		Ok(completion)
	}

	/// Stops the delegate and completes the current run.
	///
	/// Waits for a `start_async` in progress on another thread, so the
	/// delegate that run started is the one being stopped.
	///
	/// `Descriptor::stop` is always attempted. Whether or not it succeeds, the
	/// monitor is told to complete the run, so the handle resolves with
	/// [`Completion::Stopped`](crate::Completion::Stopped) after the final
	/// snapshot. Calling this before any run, or after the run has completed,
	/// does not affect the handle.
	///
	/// # Errors
	///
	/// [`Error::DelegateStop`] carries the delegate's failure.
	pub fn stop(&self) -> Result<()> {
		// Held across the delegate call so a concurrent start finishes first.
		let run = self.run.lock();
		let stopped = self.descriptor.stop();

		match run.as_ref() {
			Some(run) => {
				if !run.stop_tx.send_replace(true) {
					debug!(target = "bt.runtime", "stop requested");
				}
			}
			None => debug!(target = "bt.runtime", "stop requested before any run"),
		}

		stopped.map_err(|err| {
			warn!(target = "bt.runtime", error = %err, "delegate failed to stop");
			Error::DelegateStop(err)
		})
	}

	/// Handle of the most recent run, if any.
	pub fn completion(&self) -> Option<CompletionHandle> {
		self.run.lock().as_ref().map(|run| run.completion.clone())
	}

	/// Whether a run has been started and has not completed yet.
	pub fn is_running(&self) -> bool {
		self.run.lock().as_ref().is_some_and(|run| !run.completion.is_resolved())
	}

	pub fn session(&self) -> &Arc<S> {
		&self.session
	}

	pub fn descriptor(&self) -> &Arc<D> {
		&self.descriptor
	}

	pub fn config(&self) -> &RuntimeConfig {
		&self.config
	}
}
