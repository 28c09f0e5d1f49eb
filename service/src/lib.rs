use config::Config;
use sse::Broker;

pub mod config;
pub mod logging;

// Service-level state shared with every request handler.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub broker: Broker,
}

impl AppState {
    pub fn new(app_config: Config, broker: Broker) -> Self {
        Self {
            config: app_config,
            broker,
        }
    }

    /// Builds the broker described by `app_config` and wraps both in a new state.
    pub fn from_config(app_config: Config) -> Self {
        let broker = Broker::new(app_config.idle_timeout(), app_config.subscriber_buffer());
        Self::new(app_config, broker)
    }
}
