use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::{product_service::ProductService, storage::ProductStore};

use crate::middleware::validate_product;
use crate::openapi::ApiDoc;

pub mod products;

/// Shared handler state; the route table itself is built once at startup and
/// read-only afterwards.
#[derive(Clone)]
pub struct ServerState {
    pub products: Arc<ProductService<dyn ProductStore>>,
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service healthy"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router. Mutating product routes pass through the
/// validation middleware; reads and deletes dispatch straight to the handler.
pub fn build_router(state: ServerState, cors: CorsLayer, read_timeout: Duration) -> Router {
    let read = Router::new()
        .route("/products", get(products::list))
        .route("/products/:id", get(products::get).delete(products::delete));

    let mutating = Router::new()
        .route("/products", post(products::create))
        .route("/products/:id", put(products::update))
        .route_layer(middleware::from_fn(validate_product));

    Router::new()
        .route("/health", get(health))
        .merge(read)
        .merge(mutating)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TimeoutLayer::new(read_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                ),
        )
}
