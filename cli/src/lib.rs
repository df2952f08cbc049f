//! `hassio` command-line client.
//!
//! Resolves settings once, initializes logging from them, then runs exactly
//! one subcommand against the supervisor and maps its outcome to the
//! process exit code.

pub mod cli;
pub mod commands;
pub mod telemetry;
pub mod transport;

use std::{io, process::ExitCode};

use hassio_core::{settings, ConfigFileStatus, SupervisorClient};
use tracing::{debug, error, info, level_filters::LevelFilter, warn};

pub use cli::CliArgs;
pub use commands::Status;
pub use transport::UreqTransport;

pub fn run(args: CliArgs) -> ExitCode {
    let settings = match settings::load(args.global.config.as_deref(), &args.global.overrides()) {
        Ok(settings) => settings,
        Err(err) => {
            telemetry::init(LevelFilter::ERROR);
            error!(error = %err, "error while resolving configuration");
            return ExitCode::FAILURE;
        }
    };

    telemetry::init(settings.log_level);
    if let Some(level) = settings.unrecognised_log_level.as_deref() {
        warn!(level, "unrecognised log level, using warn");
    }
    match &settings.config_status {
        ConfigFileStatus::Loaded => {
            info!("using config file {}", settings.config_file.display())
        }
        ConfigFileStatus::NotFound => info!("no config file found"),
        ConfigFileStatus::Rejected(reason) => warn!(
            error = %reason,
            "ignoring config file {}",
            settings.config_file.display()
        ),
    }
    debug!(
        config_file = %settings.config_file.display(),
        endpoint = %settings.endpoint,
        log_level = %settings.log_level,
        api_token = settings.api_token.as_ref().map(|_| "<redacted>"),
        "resolved settings"
    );

    let client = SupervisorClient::new(&settings);
    let mut out = io::stdout().lock();
    match commands::execute(&args.command, &client, &UreqTransport, &mut out) {
        Ok(status) => status.into(),
        Err(err) => {
            error!(error = %err, "failed to write output");
            ExitCode::FAILURE
        }
    }
}
