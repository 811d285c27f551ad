//! GET /api/user/balance, POST /api/user/balance/withdraw,
//! GET /api/user/withdrawals (§6.1).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::transactions::TransactionRepository;
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::user_auth::AuthUser;

#[derive(Debug, Serialize)]
pub struct BalanceJson {
    pub current: i64,
    pub withdrawn: i64,
}

pub async fn get_balance(
    State(state): State<AppState>,
    Extension(AuthUser(login)): Extension<AuthUser>,
) -> Result<Json<BalanceJson>, ApiError> {
    let account = state.balance.get_account(&login).await?;
    Ok(Json(BalanceJson {
        current: account.balance,
        withdrawn: account.withdrawn,
    }))
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub order: String,
    pub sum: i64,
}

pub async fn withdraw(
    State(state): State<AppState>,
    Extension(AuthUser(login)): Extension<AuthUser>,
    Json(body): Json<WithdrawRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .balance
        .withdraw(&login, &body.order, body.sum)
        .await?;
    Ok(StatusCode::OK)
}

#[derive(Debug, Serialize)]
pub struct WithdrawalJson {
    pub order: String,
    pub sum: i64,
    pub processed_at: DateTime<Utc>,
}

pub async fn list_withdrawals(
    State(state): State<AppState>,
    Extension(AuthUser(login)): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let rows = TransactionRepository::withdrawals_for_user(state.db.pool(), &login)
        .await
        .map_err(ApiError::from)?;

    if rows.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<WithdrawalJson> = rows
        .into_iter()
        .map(|(order, sum, processed_at)| WithdrawalJson {
            order,
            sum,
            processed_at,
        })
        .collect();
    Ok(Json(body).into_response())
}
