use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Target prefix shared by every bridge crate (`medbridge`, `medbridge_host`, ...).
const BRIDGE_TARGET: &str = "medbridge";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// `level` applies to the bridge crates. Dependencies such as reqwest and
/// hyper never log below warn.
pub fn bridge_filter(level: LogLevel) -> Targets {
    let level = level.as_filter();
    Targets::new()
        .with_target(BRIDGE_TARGET, level)
        .with_default(level.min(LevelFilter::WARN))
}

/// Route bridge logs to stderr so stdout stays machine-readable.
///
/// Fails when a global subscriber is already installed.
pub fn init_logging(format: LogFormat, level: LogLevel) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);
    let filter = bridge_filter(level);

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_target(true).with_filter(filter))
            .try_init(),
    }
}
