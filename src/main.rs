use log::{error, info};
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    info!(
        "Starting infocenter (idle timeout {}s, subscriber buffer {})",
        config.idle_timeout_secs, config.subscriber_buffer
    );

    let app_state = AppState::from_config(config);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }

    info!("Server stopped");
}
