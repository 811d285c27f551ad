//! Result sink (C6): serializes terminal results into the datastore as a
//! single logical update, under the account write-lock (§4.6).

use tokio::sync::mpsc;

use super::error::SinkError;
use super::error_channel::ErrorSender;
use super::worker::SinkItem;
use crate::db::accounts::AccountRepository;
use crate::db::models::TransactionType;
use crate::db::orders::OrderRepository;
use crate::db::transactions::TransactionRepository;
use crate::db::{Database, DbError};

pub struct ResultSink {
    db: Database,
    error_tx: ErrorSender,
}

impl ResultSink {
    pub fn new(db: Database, error_tx: ErrorSender) -> Self {
        Self { db, error_tx }
    }

    pub async fn run(self, mut rx: mpsc::Receiver<SinkItem>) {
        while let Some(item) = rx.recv().await {
            if let Err(e) = self.apply(&item).await {
                self.error_tx
                    .send(format!("sink: order {}: {e}", item.order_id));
            }
        }
    }

    /// §4.6's 5-step contract. Steps 4-5 run inside one transaction (§9
    /// resolution 3), closing the under-credit window the source leaves
    /// open between the status write and the balance write.
    pub async fn apply(&self, item: &SinkItem) -> Result<(), SinkError> {
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        AccountRepository::lock_for_update(&mut tx, &item.user_login).await?;
        let existing = TransactionRepository::existing_type(&mut tx, &item.order_id).await?;

        if item.amount > 0 && matches!(existing, Some(TransactionType::Accrual)) {
            tx.rollback().await.map_err(DbError::from)?;
            return Err(SinkError::DuplicateAccrual);
        }

        OrderRepository::set_terminal_status(&mut tx, &item.order_id, item.status).await?;

        if item.amount > 0 {
            AccountRepository::credit_accrual(&mut tx, &item.user_login, item.amount).await?;
            TransactionRepository::insert_accrual(
                &mut tx,
                &item.order_id,
                &item.user_login,
                item.amount,
            )
            .await?;
        }

        tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }
}
