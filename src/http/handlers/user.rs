//! POST /api/user/register, POST /api/user/login (§6.1).

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

fn token_response(status: StatusCode, token: &str) -> Result<Response, ApiError> {
    let mut response = status.into_response();
    let value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    response.headers_mut().insert(header::AUTHORIZATION, value);
    Ok(response)
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Response, ApiError> {
    if body.login.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "login and password are required".to_string(),
        ));
    }

    state.auth.register(&body.login, &body.password).await?;
    let token = state.auth.login(&body.login, &body.password).await?;
    token_response(StatusCode::OK, &token)
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Response, ApiError> {
    if body.login.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "login and password are required".to_string(),
        ));
    }

    let token = state.auth.login(&body.login, &body.password).await?;
    token_response(StatusCode::OK, &token)
}
