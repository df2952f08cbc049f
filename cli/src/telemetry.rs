use std::io;

use tracing::level_filters::LevelFilter;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing at `level` and bridge `log` records (ureq logs that way).
///
/// Output goes to stderr so stdout carries nothing but response bodies and
/// error lines. Safe to call multiple times; subsequent calls are no-ops.
pub fn init(level: LevelFilter) {
    let _ = LogTracer::init();

    let filter = EnvFilter::default().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
