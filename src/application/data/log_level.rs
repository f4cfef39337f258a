use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

/// Verbosity of the diagnostic log written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    /// No subscriber is installed at all
    Silent,
}

impl LogLevel {
    pub fn to_level_filter(self) -> Option<LevelFilter> {
        match self {
            LogLevel::Debug => Some(LevelFilter::DEBUG),
            LogLevel::Info => Some(LevelFilter::INFO),
            LogLevel::Warn => Some(LevelFilter::WARN),
            LogLevel::Error => Some(LevelFilter::ERROR),
            LogLevel::Silent => None,
        }
    }
}
