//! HTTP surface (C10): axum router exposing §6.1's seven routes behind
//! gzip compression and the session-token middleware.

pub mod error;
pub mod handlers;
pub mod state;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let private_routes = Router::new()
        .route(
            "/orders",
            post(handlers::orders::submit).get(handlers::orders::list),
        )
        .route("/balance", get(handlers::balance::get_balance))
        .route("/balance/withdraw", post(handlers::balance::withdraw))
        .route("/withdrawals", get(handlers::balance::list_withdrawals))
        .layer(from_fn_with_state(
            state.clone(),
            crate::user_auth::require_auth,
        ));

    let public_routes = Router::new()
        .route("/register", post(handlers::user::register))
        .route("/login", post(handlers::user::login));

    Router::new()
        .nest(
            "/api/user",
            public_routes.merge(private_routes),
        )
        .layer(CompressionLayer::new())
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
