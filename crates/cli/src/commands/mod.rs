//! Command dispatch.

mod run;
mod validate;

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub use run::{RunSummary, run};
pub use validate::{ValidationReport, validate, validate_document};

pub async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Run(args) => run(args).await,
		Commands::Validate(args) => validate(args),
	}
}
