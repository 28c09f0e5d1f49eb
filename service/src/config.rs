use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::time::Duration;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that are allowed to receive server responses.
    /// A single `*` allows any origin.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "*"
    )]
    pub allowed_origins: Vec<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Seconds an event stream stays open before it is closed with a timeout event
    #[arg(long, env, default_value_t = 30)]
    pub idle_timeout_secs: u64,

    /// Number of undelivered messages each subscriber channel can hold (minimum 1)
    #[arg(long, env, default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..))]
    pub subscriber_buffer: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("127.0.0.1")
    }

    /// The `interface:port` pair the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.interface(), self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn subscriber_buffer(&self) -> usize {
        usize::from(self.subscriber_buffer)
    }

    /// True when CORS should allow any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("infocenter").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_defaults_match_reference_behavior() {
        let config = parse(&[]);

        assert_eq!(config.idle_timeout(), Duration::from_secs(30));
        assert_eq!(config.subscriber_buffer(), 1);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_bind_address_combines_interface_and_port() {
        let config = parse(&["--interface", "0.0.0.0", "--port", "9000"]);

        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_explicit_origins_disable_any_origin() {
        let config = parse(&[
            "--allowed-origins",
            "http://localhost:3000,https://example.com",
        ]);

        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://example.com"]
        );
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_log_level_is_parsed() {
        let config = parse(&["--log-level-filter", "DEBUG"]);

        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn test_zero_subscriber_buffer_is_rejected() {
        let result = Config::try_parse_from(["infocenter", "--subscriber-buffer", "0"]);

        assert!(result.is_err());
    }
}
