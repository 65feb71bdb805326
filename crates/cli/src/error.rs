use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// Command failed but output has already been printed (e.g., validation report).
	/// Used to signal exit code 1 without additional output.
	#[error("")]
	OutputAlreadyPrinted,

	#[error("invalid runtime config: {path}")]
	Config {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("invalid schema: {path}")]
	Schema {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error(transparent)]
	Runtime(#[from] bt_runtime::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	/// Check if this error indicates output has already been printed.
	/// When true, the caller should exit with code 1 without printing additional output.
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, CliError::OutputAlreadyPrinted)
	}

	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			CliError::OutputAlreadyPrinted => (ErrorCode::InternalError, String::new(), None),
			CliError::Config { path, source } => (
				ErrorCode::InvalidInput,
				format!("Runtime config {} is invalid: {source}", path.display()),
				Some(serde_json::json!({ "path": path })),
			),
			CliError::Schema { path, source } => (
				ErrorCode::InvalidInput,
				format!("Schema {} is invalid: {source}", path.display()),
				Some(serde_json::json!({ "path": path })),
			),
			CliError::InvalidArgument(msg) => (ErrorCode::InvalidInput, msg.clone(), None),
			CliError::Runtime(err) => (ErrorCode::SessionError, err.to_string(), None),
			CliError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
			CliError::Json(err) => (ErrorCode::InvalidInput, format!("JSON error: {err}"), None),
			CliError::Anyhow(err) => (ErrorCode::InternalError, format!("{err:#}"), None),
		};

		CommandError {
			code,
			message,
			details,
		}
	}
}
