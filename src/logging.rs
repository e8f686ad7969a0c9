use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::error::FeedError;
use crate::types::Record;

/// Initialize the logging system with appropriate filters and formatting
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_with_level("info")
}

/// Initialize logging, using `default_level` when RUST_LOG is not set
pub fn init_logging_with_level(default_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays clean for parsed output
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()?;

    info!("Logging system initialized");
    Ok(())
}

/// Initialize logging with custom configuration for testing
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

/// Log a feed error with appropriate severity level
pub fn log_feed_error(error: &FeedError, context: Option<&str>) {
    let level = error.severity().to_tracing_level();
    let message = if let Some(ctx) = context {
        format!("{}: {}", ctx, error)
    } else {
        error.to_string()
    };

    match level {
        tracing::Level::INFO => info!("{}", message),
        tracing::Level::WARN => warn!("{}", message),
        _ => error!("{}", message),
    }
}

/// Log a parsed record at debug level
pub fn log_record(record: &Record) {
    debug!(
        symbol = %record.symbol(),
        time = %record.time(),
        value = %record.value(),
        "Record parsed"
    );
}

/// Log the start of a feed
pub fn log_startup(component: &str, source: Option<&str>) {
    if let Some(source) = source {
        info!(component = component, source = source, "Feed started");
    } else {
        info!(component = component, "Feed started");
    }
}
