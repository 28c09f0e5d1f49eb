use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// HTTP stack modules that drown out broker logs unless we're tracing.
const FILTERED_MODULES: &[&str] = &["hyper", "axum", "tower", "tower_http", "tracing", "mio"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the configured level.
    ///
    /// Below Trace, logs from the HTTP stack are suppressed so subscription
    /// and publish activity stays readable.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;

        TermLogger::init(
            level,
            Self::build_log_config(level),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
    }

    fn build_log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        for module in Self::ignored_modules(level) {
            builder.add_filter_ignore_str(module);
        }

        builder.build()
    }

    /// Modules whose records are dropped at `level`.
    fn ignored_modules(level: LevelFilter) -> &'static [&'static str] {
        if level == LevelFilter::Trace {
            &[]
        } else {
            FILTERED_MODULES
        }
    }
}
