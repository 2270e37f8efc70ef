use clap::Parser;
use reveal_cli::{cli::Cli, commands, logging, output::Printer};
use tracing::debug;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);
	let printer = Printer::new(cli.format, cli.command.name());

	if let Err(err) = commands::dispatch(cli, &printer).await {
		debug!(target = "reveal", error = ?err, "command failed");
		printer.failure(&err);
		std::process::exit(err.exit_code());
	}
}
