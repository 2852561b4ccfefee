//! Axum router construction.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // HEAD on the data paths answers like the info endpoints.
    let stream_routes = Router::new()
        .route(
            "/{video_id}",
            get(routes::stream::stream_by_id).head(routes::stream::info_by_id),
        )
        .route(
            "/file/{encoded_path}",
            get(routes::stream::stream_by_path).head(routes::stream::info_by_path),
        )
        .route("/info/{video_id}", get(routes::stream::info_by_id))
        .route(
            "/info/file/{encoded_path}",
            get(routes::stream::info_by_path),
        );

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/stream", stream_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
