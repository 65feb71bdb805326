
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Root CLI for bt.
#[derive(Parser, Debug)]
#[command(name = "bt")]
#[command(about = "Drive session runtimes and validate structured documents")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run a simulated transfer under a session runtime, streaming progress as NDJSON.
	Run(RunArgs),
	/// Validate a JSON document against a rule schema.
	Validate(ValidateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
	/// How long the simulated transfer takes to finish on its own.
	#[arg(long, value_name = "MS")]
	pub duration_ms: u64,

	/// Report progress every MS milliseconds (plus once at the end).
	#[arg(long, value_name = "MS")]
	pub period_ms: Option<u64>,

	/// Stop the run after MS milliseconds.
	#[arg(long, value_name = "MS")]
	pub stop_after_ms: Option<u64>,

	/// Number of pieces in the simulated transfer.
	#[arg(long, value_name = "N", default_value_t = 100)]
	pub pieces: u32,

	/// Runtime config JSON file.
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Override the activity poll interval.
	#[arg(long, value_name = "MS")]
	pub poll_ms: Option<u64>,

	/// Override the auto-stop deadline.
	#[arg(long, value_name = "MS")]
	pub deadline_ms: Option<u64>,

	/// Signal completion through the activity flag instead of polling.
	#[arg(long)]
	pub push: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
	/// Rule schema JSON file.
	#[arg(long, value_name = "FILE")]
	pub schema: PathBuf,

	/// Document to validate. Reads stdin when omitted.
	#[arg(value_name = "INPUT")]
	pub input: Option<PathBuf>,
}
