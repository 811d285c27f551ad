//! Transaction repository (§3 Transaction, at-most-one-accrual invariant).

use sqlx::{PgPool, Postgres, Transaction as SqlxTx};
use std::str::FromStr;

use super::{DbError, TransactionType};

pub struct TransactionRepository;

impl TransactionRepository {
    /// The transaction type already recorded for an order, if any. `orders_number`
    /// is the table's primary key, so an order has at most one transaction
    /// overall (§3, §9 open question 2).
    pub async fn existing_type(
        tx: &mut SqlxTx<'_, Postgres>,
        order_number: &str,
    ) -> Result<Option<TransactionType>, DbError> {
        let row = sqlx::query!(
            r#"SELECT type FROM transactions WHERE order_number = $1"#,
            order_number,
        )
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row
            .map(|r| TransactionType::from_str(&r.r#type).expect("type check constraint")))
    }

    pub async fn insert_accrual(
        tx: &mut SqlxTx<'_, Postgres>,
        order_number: &str,
        user_login: &str,
        amount: i64,
    ) -> Result<(), DbError> {
        sqlx::query!(
            r#"INSERT INTO transactions (order_number, user_login, type, amount)
               VALUES ($1, $2, 'ACCRUAL', $3)"#,
            order_number,
            user_login,
            amount,
        )
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn insert_withdrawal(
        tx: &mut SqlxTx<'_, Postgres>,
        order_number: &str,
        user_login: &str,
        amount: i64,
    ) -> Result<(), DbError> {
        sqlx::query!(
            r#"INSERT INTO transactions (order_number, user_login, type, amount)
               VALUES ($1, $2, 'WITHDRAWAL', $3)"#,
            order_number,
            user_login,
            amount,
        )
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// A user's withdrawal history, newest first (§6.1 GET /withdrawals).
    pub async fn withdrawals_for_user(
        pool: &PgPool,
        user_login: &str,
    ) -> Result<Vec<(String, i64, chrono::DateTime<chrono::Utc>)>, DbError> {
        let rows = sqlx::query!(
            r#"SELECT order_number, amount, created_at FROM transactions
               WHERE user_login = $1 AND type = 'WITHDRAWAL'
               ORDER BY created_at DESC"#,
            user_login,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.order_number, r.amount, r.created_at))
            .collect())
    }
}
