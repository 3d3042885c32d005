use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:user_id/movies/:movie_id/prediction",
            get(handlers::predict_rating),
        )
        .route("/users/:user_id/ratings", get(handlers::get_user_ratings))
        .route(
            "/users/:user_id/ratings/:movie_id",
            put(handlers::set_rating),
        )
        .route("/movies/:movie_id/ratings", get(handlers::get_movie_ratings))
}
