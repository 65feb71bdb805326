//! Error types for the session runtime.

use thiserror::Error;

use crate::descriptor::DelegateError;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a session.
#[derive(Debug, Error)]
pub enum Error {
	/// `start_async` was called while a run is still in progress.
	#[error("Can't start: session is already running")]
	AlreadyRunning,

	/// The delegate refused to start. No run was created.
	#[error("Failed to start delegate: {0}")]
	DelegateStart(#[source] DelegateError),

	/// The delegate failed to stop. The run was still completed.
	#[error("Failed to stop delegate: {0}")]
	DelegateStop(#[source] DelegateError),

	/// Listener period must be greater than zero.
	#[error("Invalid listener period: must be non-zero")]
	InvalidPeriod,

	/// Runtime configuration rejected by the builder.
	#[error("Invalid runtime configuration: {0}")]
	InvalidConfig(String),

	/// No tokio executor was supplied or found on the current thread.
	#[error("No async executor available: {0}")]
	NoExecutor(String),

	/// The monitor task was torn down before it could complete the run.
	#[error("Session monitor was interrupted before the run completed")]
	MonitorInterrupted,
}

impl Error {
	pub fn is_already_running(&self) -> bool {
		matches!(self, Error::AlreadyRunning)
	}

	/// Returns true if the underlying delegate reported the failure.
	pub fn is_delegate_failure(&self) -> bool {
		matches!(self, Error::DelegateStart(_) | Error::DelegateStop(_))
	}

	pub fn is_interrupted(&self) -> bool {
		matches!(self, Error::MonitorInterrupted)
	}
}
