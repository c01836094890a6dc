use axum::{
    extract::State,
    http::Method,
    middleware,
    response::Html,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    dataset::Dataset,
    middleware::{handle_panic, make_span_with_request_id, request_id_middleware},
    models::HealthStatus,
};

pub mod recommendations;

/// Search page served at `/`
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Shared, read-only application state
pub struct AppState {
    pub dataset: Dataset,
    pub poster_url: String,
}

impl AppState {
    pub fn new(dataset: Dataset, poster_url: impl Into<String>) -> Self {
        Self {
            dataset,
            poster_url: poster_url.into(),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/recommend", get(recommendations::recommend))
        .with_state(state);

    with_middleware(routes)
}

/// Wraps `router` in the request id, tracing, panic and CORS layers
pub fn with_middleware(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(cors),
    )
}

async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        movies: state.dataset.len(),
        loaded_at: state.dataset.loaded_at(),
    })
}
