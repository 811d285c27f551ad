//! Maps every domain error to the HTTP status in §7's taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::balance::BalanceError;
use crate::db::DbError;
use crate::user_auth::AuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("incorrect order id")]
    IncorrectOrderId,
    #[error("order already submitted by this user")]
    DuplicateOrderSameUser,
    #[error("order already submitted by a different user")]
    DuplicateOrderOtherUser,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("login already registered")]
    DuplicateLogin,
    #[error("invalid login or password")]
    InvalidCredentials,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BalanceError> for ApiError {
    fn from(e: BalanceError) -> Self {
        match e {
            BalanceError::IncorrectOrderId => ApiError::IncorrectOrderId,
            BalanceError::DuplicateOrderSameUser => ApiError::DuplicateOrderSameUser,
            BalanceError::DuplicateOrderOtherUser => ApiError::DuplicateOrderOtherUser,
            BalanceError::InsufficientFunds => ApiError::InsufficientFunds,
            BalanceError::InvalidAmount => {
                ApiError::BadRequest("withdrawal amount must be positive".to_string())
            }
            BalanceError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::DuplicateLogin => ApiError::DuplicateLogin,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Database(e) => ApiError::Internal(e.to_string()),
            AuthError::Token(e) => ApiError::Internal(e.to_string()),
            AuthError::Hash(e) => ApiError::Internal(e),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            // DuplicateOrderSameUser is an idempotent re-submit, not a
            // failure — it maps to 200 per §7, distinct from 409.
            ApiError::DuplicateOrderSameUser => StatusCode::OK,
            ApiError::IncorrectOrderId => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DuplicateOrderOtherUser => StatusCode::CONFLICT,
            ApiError::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
            ApiError::DuplicateLogin => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if !matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::debug!(%self, %status, "request rejected");
        } else {
            tracing::error!(%self, "internal error");
        }

        status.into_response()
    }
}
