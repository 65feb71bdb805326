//! Contracts for the managed unit of work and its state.

use std::sync::Arc;

use tokio::sync::watch;

/// Error raised by a delegate's own `start`/`stop`.
pub type DelegateError = Box<dyn std::error::Error + Send + Sync>;

/// Receiver side of an [`ActivityFlag`].
pub type ActivityWatch = watch::Receiver<bool>;

/// Callback receiving state snapshots.
pub type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Controllable handle for a long-running unit of work.
///
/// The runtime reads `is_active()` from its monitor task while `stop()` may be
/// invoked from any other thread, so implementations keep their activity state
/// in something shareable such as an [`ActivityFlag`].
pub trait Descriptor: Send + Sync + 'static {
	/// Whether the work is currently running.
	fn is_active(&self) -> bool;

	/// Begins the work. Must return promptly.
	fn start(&self) -> Result<(), DelegateError>;

	/// Requests the work to end. Must return promptly.
	fn stop(&self) -> Result<(), DelegateError>;

	/// Push-based completion signal.
	///
	/// When this returns a watch, the monitor waits for it to turn `false`
	/// instead of polling [`Descriptor::is_active`].
	fn activity(&self) -> Option<ActivityWatch> {
		None
	}
}

/// Read-only state reporting paired with a [`Descriptor`].
pub trait Session: Send + Sync + 'static {
	/// Immutable snapshot handed to listeners.
	type State: Send + 'static;

	fn state(&self) -> Self::State;
}

/// Shared activity state owned by a descriptor and observed by the monitor.
///
/// Clones refer to the same flag.
#[derive(Debug, Clone)]
pub struct ActivityFlag {
	tx: Arc<watch::Sender<bool>>,
}

impl Default for ActivityFlag {
	fn default() -> Self {
		Self::new()
	}
}

impl ActivityFlag {
	/// Creates an inactive flag.
	pub fn new() -> Self {
		let (tx, _) = watch::channel(false);
		Self { tx: Arc::new(tx) }
	}

	pub fn is_active(&self) -> bool {
		*self.tx.borrow()
	}

	/// Updates the flag, waking watchers only on an actual change.
	pub fn set_active(&self, active: bool) {
		self.tx.send_if_modified(|current| {
			if *current == active {
				return false;
			}
			*current = active;
			true
		});
	}

	pub fn subscribe(&self) -> ActivityWatch {
		self.tx.subscribe()
	}
}
