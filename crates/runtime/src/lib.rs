//! Session runtime - lifecycle control for long-running units of work
//!
//! This crate drives one start/stop cycle of a [`Descriptor`] at a time:
//!
//! - **Single activation**: a run is refused while the delegate reports active
//! - **Monitoring**: a background task waits for the delegate to go inactive,
//!   either by awaiting its [`ActivityFlag`] or by polling `is_active()`
//! - **Sampling**: an optional per-run periodic sampler forwards [`Session`]
//!   snapshots to a listener at a fixed period
//! - **Completion**: a [`CompletionHandle`] resolves exactly once, after the
//!   final snapshot has been delivered
//!
//! # Lifecycle
//!
//! ```text
//!  Idle ──start_async──► Running ──delegate inactive / stop() / deadline──► Completing ──► Terminal
//!                           │                                                    │
//!                           ├─ monitor task (executor)                           ├─ halt sampler
//!                           └─ sampler task (per run, optional)                  ├─ final snapshot
//!                                                                                └─ resolve handle
//! ```

pub mod completion;
pub mod config;
pub mod controller;
pub mod descriptor;
pub mod error;
mod sampler;

pub use completion::{Completion, CompletionHandle};
pub use config::RuntimeConfig;
pub use controller::{SessionRuntime, SessionRuntimeBuilder};
pub use descriptor::{ActivityFlag, ActivityWatch, DelegateError, Descriptor, Listener, Session};
pub use error::{Error, Result};
