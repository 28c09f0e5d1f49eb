use crate::{
    controller::{health_check_controller, message_controller},
    stream::handler::sse_handler,
    AppState,
};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use log::*;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state);

    Router::new()
        .merge(health_routes())
        .merge(infocenter_routes(app_state))
        .layer(cors)
}

fn infocenter_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/infocenter/:topic",
            get(sse_handler).post(message_controller::publish),
        )
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn cors_layer(app_state: &AppState) -> CorsLayer {
    let config = &app_state.config;

    let allow_origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin {origin}: {e}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
}
