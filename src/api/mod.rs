pub mod events;
pub mod health;
pub mod market;
pub mod positions;
pub mod risk;
pub mod session;

use crate::config::Config;
use crate::orchestration::Monitor;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<Monitor>,
    pub config: Config,
}

impl AppState {
    pub fn new(monitor: Arc<Monitor>, config: Config) -> Self {
        Self { monitor, config }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/session",
            get(session::get_session)
                .post(session::connect)
                .delete(session::disconnect),
        )
        .route("/v1/events", post(events::post_event))
        .route("/v1/positions", get(positions::get_positions))
        .route("/v1/positions/:id/risk", get(risk::get_position_risk))
        .route("/v1/simulate", post(risk::simulate))
        .route("/v1/market", get(market::get_market))
        .route("/v1/alerts", get(market::get_alerts))
        .layer(cors)
        .with_state(state)
}
