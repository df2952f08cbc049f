use std::process::ExitCode;

use clap::Parser;
use hassio_cli::CliArgs;

fn main() -> ExitCode {
    hassio_cli::run(CliArgs::parse())
}
