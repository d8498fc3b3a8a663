use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Variable holding the `EnvFilter` directives.
pub const ENV_LOG: &str = "VOLTICK_LOG";

const DEFAULT_DIRECTIVES: &str = "voltick=warn";

/// Installs the global subscriber. Logs go to stderr; stdout carries only
/// command output.
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    // A subscriber installed by an embedding process wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
}
