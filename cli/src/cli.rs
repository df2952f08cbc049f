use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hassio_core::Overrides;

/// Command-line arguments for the `hassio` binary.
#[derive(Debug, Parser)]
#[command(
    name = "hassio",
    version,
    about = "Command-line client for the Hass.io supervisor API"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand.
#[derive(Debug, Args, Default, Clone)]
pub struct GlobalArgs {
    /// Config file (default is $HOME/.homeassistant.yaml).
    #[arg(long = "config", env = "HASSIO_CONFIG", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Endpoint for the hassio supervisor (default is 'hassio').
    #[arg(long = "endpoint", value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Hassio API token.
    #[arg(long = "api-token", value_name = "TOKEN", global = true)]
    pub api_token: Option<String>,

    /// Log level (trace|debug|info|warn|error), defaults to warn.
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Request timeout in seconds; 0 disables it.
    #[arg(long = "timeout", value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            api_token: self.api_token.clone(),
            log_level: self.log_level.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Manage Hass.io add-ons.
    #[command(subcommand)]
    Addons(AddonsCommand),
}

#[derive(Debug, Subcommand, Clone)]
pub enum AddonsCommand {
    /// Show changelog of an Hass.io add-on.
    #[command(
        visible_aliases = ["cl", "ch"],
        long_about = "This command shows the changelog of an add-on. It gives you what has been \
                      changed in the latest version and tells you about possible breaking changes.",
        after_help = "Examples:\n  hassio addons changelog core_ssh\n  hassio addons changelog core_mosquitto"
    )]
    Changelog(SlugArgs),

    /// View the log output of a running Hass.io add-on.
    #[command(
        visible_aliases = ["log", "lg"],
        after_help = "Examples:\n  hassio addons logs core_ssh"
    )]
    Logs(SlugArgs),
}

#[derive(Debug, Args, Clone)]
pub struct SlugArgs {
    /// Add-on slug, e.g. core_ssh.
    pub slug: String,
}
