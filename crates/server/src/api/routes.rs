use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, titles};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Titles
        .route("/titles", get(titles::list_rows))
        .route("/titles/groups", get(titles::list_groups))
        .route("/titles/analytics", get(titles::get_analytics))
        .route("/titles/expansion", post(titles::update_expansion))
        .route("/titles/refresh", post(titles::refresh))
        .route("/titles/actions", post(titles::bulk_action))
        .route("/titles/{hash}/{action}", post(titles::single_action))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
