//! NDJSON output on stdout and structured errors on stderr.

use std::io::Write;

use serde::Serialize;

/// Structured error reported when a command fails.
#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
	/// Error code (e.g., "INVALID_INPUT", "SESSION_ERROR")
	pub code: ErrorCode,

	/// Human-readable error message
	pub message: String,

	/// Additional error details
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// Session could not be started or stopped
	SessionError,
	/// Document rejected by the schema
	ValidationFailed,
	/// Invalid input provided (bad JSON, bad schema, bad config)
	InvalidInput,
	/// File I/O error
	IoError,
	/// Unknown/internal error
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::SessionError => write!(f, "SESSION_ERROR"),
			ErrorCode::ValidationFailed => write!(f, "VALIDATION_FAILED"),
			ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
			ErrorCode::IoError => write!(f, "IO_ERROR"),
			ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
		}
	}
}

/// Writes one JSON value as a line on stdout and flushes it.
pub fn emit<T: Serialize>(value: &T) {
	let mut stdout = std::io::stdout().lock();
	match serde_json::to_string(value) {
		Ok(line) => {
			let _ = writeln!(stdout, "{line}");
			let _ = stdout.flush();
		}
		Err(err) => tracing::error!(target = "bt.cli", error = %err, "failed to serialize output"),
	}
}

pub fn print_error_stderr(error: &CommandError) {
	eprintln!("Error [{}]: {}", error.code, error.message);
}
