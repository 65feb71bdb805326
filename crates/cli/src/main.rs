use bt_cli::{cli::Cli, commands, logging, output};
use clap::Parser;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::dispatch(cli).await {
		// Validation failures have already been written to stdout
		if !err.is_output_already_printed() {
			output::print_error_stderr(&err.to_command_error());
		}
		std::process::exit(1);
	}
}
