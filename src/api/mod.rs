//! HTTP API
//! Mission: Route wiring and shared application state

pub mod authors;

use crate::auth::{auth_middleware, JwtHandler};
use crate::email::Mailer;
use crate::middleware::{
    rate_limit_middleware, request_logging, RateLimitConfig, RateLimiter,
};
use crate::store::AuthorStore;
use axum::{
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AuthorStore>,
    pub jwt: Arc<JwtHandler>,
    pub mailer: Mailer,
    pub bcrypt_cost: u32,
}

/// Build the full application router.
///
/// Auth endpoints sit behind the rate limiter; profile endpoints sit
/// behind the access guard; listing and health are open.
pub fn create_router(state: AppState, rate_limit: RateLimitConfig) -> Router {
    let limiter = RateLimiter::new(rate_limit);

    let auth_routes = Router::new()
        .route("/authors/register", post(authors::register))
        .route("/authors/verify", post(authors::verify_email))
        .route("/authors/login", post(authors::login))
        .route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/authors", get(authors::list_authors))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
