//! `bt run`: drive a simulated transfer through a [`SessionRuntime`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bt_runtime::{Completion, RuntimeConfig, Session, SessionRuntime};
use serde::Serialize;
use tracing::info;

use crate::cli::RunArgs;
use crate::config::{RuntimeOverrides, resolve_runtime_config};
use crate::error::Result;
use crate::output;
use crate::simulate::{Progress, SimulatedTransfer};

#[derive(Debug, Serialize)]
struct ProgressEvent {
	event: &'static str,
	#[serde(flatten)]
	progress: Progress,
}

/// Final line printed by `bt run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
	pub event: &'static str,
	pub outcome: Completion,
	/// Listener invocations, including the final one.
	pub samples: u64,
	pub progress: Progress,
}

pub async fn run(args: RunArgs) -> Result<()> {
	let overrides = RuntimeOverrides {
		poll_ms: args.poll_ms,
		deadline_ms: args.deadline_ms,
	};
	let config = resolve_runtime_config(args.config.as_deref(), &overrides)?;

	let summary = run_transfer(&args, config, |progress| {
		output::emit(&ProgressEvent {
			event: "progress",
			progress,
		})
	})
	.await?;

	output::emit(&summary);
	Ok(())
}

/// Runs one transfer to completion, feeding snapshots to `on_progress`.
pub(crate) async fn run_transfer<F>(args: &RunArgs, config: RuntimeConfig, on_progress: F) -> Result<RunSummary>
where
	F: Fn(Progress) + Send + Sync + 'static,
{
	let transfer = Arc::new(SimulatedTransfer::new(
		Duration::from_millis(args.duration_ms),
		args.pieces,
		args.push,
	));
	let runtime = SessionRuntime::<SimulatedTransfer, SimulatedTransfer>::builder(Arc::clone(&transfer), transfer)
		.config(config)
		.build()?;

	let samples = Arc::new(AtomicU64::new(0));
	let handle = match args.period_ms {
		Some(period_ms) => {
			let counter = Arc::clone(&samples);
			runtime.start_async_with_listener(
				move |progress| {
					counter.fetch_add(1, Ordering::SeqCst);
					on_progress(progress);
				},
				Duration::from_millis(period_ms),
			)?
		}
		None => runtime.start_async()?,
	};
	info!(
		target = "bt.cli",
		duration_ms = args.duration_ms,
		pieces = args.pieces,
		push = args.push,
		"transfer started"
	);

	let stop_after = args.stop_after_ms.map(Duration::from_millis);
	let outcome = tokio::select! {
		outcome = handle.wait() => outcome,
		reason = stop_requested(stop_after) => {
			info!(target = "bt.cli", reason, "stopping transfer");
			runtime.stop()?;
			handle.wait().await
		}
	}?;

	Ok(RunSummary {
		event: "completed",
		outcome,
		samples: samples.load(Ordering::SeqCst),
		progress: runtime.session().state(),
	})
}

/// Resolves when the user interrupts or the optional stop timer fires.
async fn stop_requested(after: Option<Duration>) -> &'static str {
	let timer = async {
		match after {
			Some(after) => tokio::time::sleep(after).await,
			None => std::future::pending().await,
		}
	};

	tokio::select! {
		Ok(()) = tokio::signal::ctrl_c() => "interrupt",
		() = timer => "stop-after",
	}
}
