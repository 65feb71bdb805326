//! Single-assignment completion signal for a run.
//!
//! A [`Resolver`] owns the write side; the first call to [`Resolver::resolve`]
//! wins and later calls are no-ops. Dropping an unresolved resolver records an
//! interruption, so waiters are never left hanging when the monitor task is
//! torn down (executor shutdown, panicking listener).

use std::future::IntoFuture;

use futures_util::future::BoxFuture;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::{Error, Result};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
	/// The delegate went inactive by itself.
	Finished,
	/// [`SessionRuntime::stop`](crate::SessionRuntime::stop) ended the run.
	Stopped,
	/// The configured deadline elapsed and the runtime stopped the delegate.
	DeadlineElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
	Completed(Completion),
	Interrupted,
}

impl Resolution {
	fn into_result(self) -> Result<Completion> {
		match self {
			Resolution::Completed(completion) => Ok(completion),
			Resolution::Interrupted => Err(Error::MonitorInterrupted),
		}
	}
}

/// Write side of a [`CompletionHandle`].
#[derive(Debug)]
pub(crate) struct Resolver {
	tx: watch::Sender<Option<Resolution>>,
}

impl Resolver {
	pub(crate) fn new() -> (Self, CompletionHandle) {
		let (tx, rx) = watch::channel(None);
		(Self { tx }, CompletionHandle { rx })
	}

	/// Stores `resolution` unless one is already present. Returns whether it was stored.
	pub(crate) fn resolve(&self, resolution: Resolution) -> bool {
		self.tx.send_if_modified(|slot| {
			if slot.is_some() {
				return false;
			}
			*slot = Some(resolution);
			true
		})
	}
}

impl Drop for Resolver {
	fn drop(&mut self) {
		self.resolve(Resolution::Interrupted);
	}
}

/// Awaitable signal that a run has ended.
///
/// Cheap to clone; every clone observes the same single resolution.
#[derive(Debug, Clone)]
pub struct CompletionHandle {
	rx: watch::Receiver<Option<Resolution>>,
}

impl CompletionHandle {
	pub fn is_resolved(&self) -> bool {
		self.rx.borrow().is_some()
	}

	/// Outcome of the run, or `None` while it is still in progress.
	pub fn outcome(&self) -> Option<Result<Completion>> {
		let resolution = *self.rx.borrow();
		resolution.map(Resolution::into_result)
	}

	/// Waits until the run has ended.
	///
	/// Returns [`Error::MonitorInterrupted`] when the monitor was torn down
	/// before completing the run.
	pub async fn wait(&self) -> Result<Completion> {
		let mut rx = self.rx.clone();
		let resolution = match rx.wait_for(Option::is_some).await {
			Ok(slot) => *slot,
			Err(_) => None,
		};
		resolution.unwrap_or(Resolution::Interrupted).into_result()
	}
}

impl IntoFuture for CompletionHandle {
	type Output = Result<Completion>;
	type IntoFuture = BoxFuture<'static, Result<Completion>>;

	fn into_future(self) -> Self::IntoFuture {
		Box::pin(async move { self.wait().await })
	}
}
