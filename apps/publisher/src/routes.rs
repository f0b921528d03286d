use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use pubsub_model::Order;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::relay::{RelayError, RelayedResponse};
use crate::state::AppState;

async fn health() -> &'static str {
    "ok"
}

async fn publish(
    State(state): State<AppState>,
    Json(order): Json<Order>,
) -> Result<RelayedResponse, RelayError> {
    info!(topic = %order.topic, message = %order.message, "publishing");
    state.publisher().publish(&order).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/publish", post(publish))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
