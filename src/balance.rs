//! Balance service (C7): read-balance, submit-order, withdraw. Shares the
//! account write-lock discipline with the result sink (§4.7).

use thiserror::Error;

use crate::db::accounts::AccountRepository;
use crate::db::orders::{OrderRepository, SubmitOutcome};
use crate::db::transactions::TransactionRepository;
use crate::db::{Account, Database, DbError};
use crate::luhn;

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("incorrect order id")]
    IncorrectOrderId,
    #[error("order already submitted by this user")]
    DuplicateOrderSameUser,
    #[error("order already submitted by a different user")]
    DuplicateOrderOtherUser,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("withdrawal amount must be positive")]
    InvalidAmount,
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

pub struct BalanceService {
    db: Database,
}

impl BalanceService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get_account(&self, user_login: &str) -> Result<Account, BalanceError> {
        Ok(AccountRepository::get(self.db.pool(), user_login).await?)
    }

    /// Validates via C1, then inserts with status `NEW`. A same-user
    /// duplicate and a cross-user duplicate are reported as distinct error
    /// variants so the HTTP layer can map them to 200 and 409 respectively.
    pub async fn submit_order(&self, user_login: &str, order_id: &str) -> Result<(), BalanceError> {
        luhn::validate(order_id).map_err(|_| BalanceError::IncorrectOrderId)?;

        match OrderRepository::submit(self.db.pool(), user_login, order_id).await? {
            SubmitOutcome::Created => Ok(()),
            SubmitOutcome::DuplicateSameUser => Err(BalanceError::DuplicateOrderSameUser),
            SubmitOutcome::DuplicateOtherUser => Err(BalanceError::DuplicateOrderOtherUser),
        }
    }

    /// `order_id` is only a Luhn-valid receipt reference; it need not exist
    /// in the orders table (§4.7).
    pub async fn withdraw(
        &self,
        user_login: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<(), BalanceError> {
        luhn::validate(order_id).map_err(|_| BalanceError::IncorrectOrderId)?;
        if amount <= 0 {
            return Err(BalanceError::InvalidAmount);
        }

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;
        let account = AccountRepository::lock_for_update(&mut tx, user_login).await?;

        if amount > account.balance {
            tx.rollback().await.map_err(DbError::from)?;
            return Err(BalanceError::InsufficientFunds);
        }

        TransactionRepository::insert_withdrawal(&mut tx, order_id, user_login, amount).await?;
        AccountRepository::debit_withdrawal(&mut tx, user_login, amount).await?;
        tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }
}
