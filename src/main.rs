//! Entry point for the `planlock` CLI. It parses arguments, resolves the data
//! directory and config, dispatches to the command handler, and maps errors
//! to exit codes.

use planlock::cli::Cli;
use planlock::context::DataContext;
use planlock::error::Result;
use planlock::{commands, exit_codes, logging};
use std::process::ExitCode;

fn run(cli: Cli) -> Result<()> {
    let ctx = DataContext::resolve(cli.data_dir.as_deref())?;
    let config = ctx.load_config()?;
    logging::init(cli.verbose, &config);

    commands::dispatch(ctx, config, cli.command)
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
