//! POST/GET /api/user/orders (§6.1, §6.2).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::balance::BalanceError;
use crate::db::orders::OrderRepository;
use crate::db::{Order, OrderStatus};
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::user_auth::AuthUser;

#[derive(Debug, Serialize)]
pub struct OrderJson {
    pub number: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrual: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

impl OrderJson {
    fn from_row(order: Order, accrual: Option<i64>) -> Self {
        Self {
            number: order.id,
            status: order.status,
            accrual: accrual.filter(|a| *a != 0),
            uploaded_at: order.uploaded_at,
        }
    }
}

/// Body is the raw order-id digit string, not JSON (§6.1).
pub async fn submit(
    State(state): State<AppState>,
    Extension(AuthUser(login)): Extension<AuthUser>,
    body: String,
) -> Result<StatusCode, ApiError> {
    match state.balance.submit_order(&login, body.trim()).await {
        Ok(()) => Ok(StatusCode::ACCEPTED),
        Err(BalanceError::DuplicateOrderSameUser) => Ok(StatusCode::OK),
        Err(e) => Err(e.into()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(AuthUser(login)): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let rows = OrderRepository::for_user(state.db.pool(), &login)
        .await
        .map_err(ApiError::from)?;

    if rows.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<OrderJson> = rows
        .into_iter()
        .map(|(order, accrual)| OrderJson::from_row(order, accrual))
        .collect();
    Ok(Json(body).into_response())
}
