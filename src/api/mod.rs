//! HTTP API server

use axum::{
    extract::Request,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::storage::QnaStore;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::DELETE]);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/questions/",
            get(handlers::list_questions).post(handlers::create_question),
        )
        .route(
            "/questions/:id",
            get(handlers::get_question).delete(handlers::delete_question),
        )
        .route("/questions/:id/answers/", post(handlers::create_answer))
        .route(
            "/answers/:id",
            get(handlers::get_answer).delete(handlers::delete_answer),
        )
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            id = %uuid::Uuid::new_v4(),
                        )
                    }),
                )
                .layer(cors),
        )
        .with_state(state)
}

/// Convenience helper when only a store is at hand
pub fn create_router_with_store(store: Arc<dyn QnaStore>) -> Router {
    create_router(AppState::new(store))
}
