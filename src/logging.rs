// src/logging.rs
// =============================================================================
// Log output setup.
//
// `subscriber()` builds a tracing subscriber as a plain value. main.rs
// installs it as the global default once; tests that want to look at log
// output build one with `subscriber_with_writer` over an in-memory buffer
// and scope it with `tracing::subscriber::with_default` instead.
//
// The filter comes only from --debug. RUST_LOG is deliberately not read.
// =============================================================================

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter directives for our own crate; dependencies stay at `warn` so
/// --debug does not flood the output with hyper internals.
pub fn filter_directives(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

pub fn subscriber(debug: bool) -> impl Subscriber + Send + Sync {
    subscriber_with_writer(debug, std::io::stderr)
}

/// Same as `subscriber`, writing wherever `writer` points.
pub fn subscriber_with_writer<W>(debug: bool, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directives(debug)))
        .with_writer(writer)
        .with_ansi(false)
        // Normal runs print "<time> <message>", debug adds level and target
        .with_level(debug)
        .with_target(debug)
        .finish()
}

/// Installs the subscriber for the whole process. Calling this twice is
/// harmless; the second call just leaves the first subscriber in place.
pub fn init(debug: bool) {
    if tracing::subscriber::set_global_default(subscriber(debug)).is_err() {
        tracing::debug!("logging already initialized");
    }
}
