use slog::{o, Drain, Logger};
use slog_async::Async;
use slog_term::{FullFormat, TermDecorator};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Configuration for setting up the terminal logger
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    async_buffer_size: usize,
    use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            async_buffer_size: 1024,
            use_color: true,
        }
    }
}

/// Sets up a structured terminal logger for hosts embedding the engine.
pub fn setup_logger(config: LoggerConfig) -> Logger {
    let decorator = {
        let builder = TermDecorator::new();
        let builder = if config.use_color {
            builder.force_color()
        } else {
            builder
        };
        builder.build()
    };

    let drain = FullFormat::new(decorator).build().fuse();

    let drain = Async::new(drain)
        .chan_size(config.async_buffer_size)
        .build()
        .fuse();

    Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

/// Initializes the tracing subscriber from configuration. Library code logs
/// through `tracing`; this wires those spans and events to stdout with an
/// env-filter (`RUST_LOG` overrides the configured level).
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    // A host (or an earlier test) may have installed a subscriber already.
    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}
