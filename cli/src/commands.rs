//! Subcommand adapter: each subcommand names a fixed supervisor operation,
//! the core resolves and classifies it, and the outcome is printed here.

use std::io::{self, Write};

use hassio_core::{Operation, Outcome, SupervisorClient, Transport};
use tracing::debug;

use crate::cli::{AddonsCommand, Command};

pub const ADDON_CHANGELOG: Operation =
    Operation::get("addons", "{slug}/changelog").accept("text/plain");
pub const ADDON_LOGS: Operation = Operation::get("addons", "{slug}/logs").accept("text/plain");

/// Process-level result of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    ExitWithError,
}

impl From<Status> for std::process::ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => Self::SUCCESS,
            Status::ExitWithError => Self::FAILURE,
        }
    }
}

pub fn execute<T, W>(
    command: &Command,
    client: &SupervisorClient,
    transport: &T,
    out: &mut W,
) -> io::Result<Status>
where
    T: Transport + ?Sized,
    W: Write,
{
    let outcome = match command {
        Command::Addons(AddonsCommand::Changelog(args)) => {
            debug!(slug = %args.slug, "addons changelog");
            client.call(transport, &ADDON_CHANGELOG, &[("slug", args.slug.as_str())])
        }
        Command::Addons(AddonsCommand::Logs(args)) => {
            debug!(slug = %args.slug, "addons logs");
            client.call(transport, &ADDON_LOGS, &[("slug", args.slug.as_str())])
        }
    };
    report(&outcome, out)
}

/// Print the body for success and expected failure, the error otherwise.
pub fn report<W: Write>(outcome: &Outcome, out: &mut W) -> io::Result<Status> {
    match outcome {
        Outcome::Success { body, .. } | Outcome::ExpectedFailure { body, .. } => {
            out.write_all(body)?;
            out.write_all(b"\n")?;
            out.flush()?;
            Ok(Status::Ok)
        }
        Outcome::UnexpectedFailure(err) => {
            writeln!(out, "{err}")?;
            out.flush()?;
            Ok(Status::ExitWithError)
        }
    }
}
