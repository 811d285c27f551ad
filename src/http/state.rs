//! Shared application state handed to every axum handler (§6.1).

use std::sync::Arc;

use crate::balance::BalanceService;
use crate::db::Database;
use crate::user_auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Arc<AuthService>,
    pub balance: Arc<BalanceService>,
}

impl AppState {
    pub fn new(db: Database, auth: AuthService, balance: BalanceService) -> Self {
        Self {
            db,
            auth: Arc::new(auth),
            balance: Arc::new(balance),
        }
    }
}
