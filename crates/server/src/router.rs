use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::ProxyState};

pub(crate) fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/create-campaign", post(handlers::create_campaign))
        .route("/campaign/{id}", get(handlers::get_campaign))
        .route("/campaign/{id}/pledge", post(handlers::pledge))
        .route("/campaign/{id}/withdraw", post(handlers::withdraw))
        .route("/campaign/{id}/refund", post(handlers::refund))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
