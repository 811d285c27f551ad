//! Order repository (§3 Order, §4.5 Poller, §4.7 SubmitOrder).

use sqlx::{PgPool, Postgres, Transaction as SqlxTx};
use std::str::FromStr;

use super::{DbError, Order, OrderStatus};

pub struct OrderRepository;

/// Outcome of submitting an order id that already exists.
pub enum SubmitOutcome {
    Created,
    DuplicateSameUser,
    DuplicateOtherUser,
}

impl OrderRepository {
    /// Insert an order with status NEW. Resolves duplicate-key conflicts per
    /// §4.7: same owner is a no-op duplicate, different owner is reported so
    /// the caller can map it to 409.
    pub async fn submit(pool: &PgPool, user_login: &str, order_id: &str) -> Result<SubmitOutcome, DbError> {
        let inserted = sqlx::query!(
            r#"INSERT INTO orders (id, user_login, status) VALUES ($1, $2, 'NEW')
               ON CONFLICT (id) DO NOTHING"#,
            order_id,
            user_login,
        )
        .execute(pool)
        .await?;

        if inserted.rows_affected() == 1 {
            return Ok(SubmitOutcome::Created);
        }

        let owner = sqlx::query!(r#"SELECT user_login FROM orders WHERE id = $1"#, order_id)
            .fetch_one(pool)
            .await?
            .user_login;

        if owner == user_login {
            Ok(SubmitOutcome::DuplicateSameUser)
        } else {
            Ok(SubmitOutcome::DuplicateOtherUser)
        }
    }

    /// Orders whose status is in {NEW, PROCESSING}, ordered by uploaded_at
    /// ascending (§4.5).
    pub async fn unfinished(pool: &PgPool) -> Result<Vec<Order>, DbError> {
        let rows = sqlx::query!(
            r#"SELECT id, user_login, status, uploaded_at
               FROM orders WHERE status IN ('NEW', 'PROCESSING')
               ORDER BY uploaded_at ASC"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Order {
                id: r.id,
                user_login: r.user_login,
                status: OrderStatus::from_str(&r.status).expect("status check constraint"),
                uploaded_at: r.uploaded_at,
            })
            .collect())
    }

    /// All orders for a user, most recently uploaded first, joined with any
    /// accrual amount (§6.2 listing).
    pub async fn for_user(pool: &PgPool, user_login: &str) -> Result<Vec<(Order, Option<i64>)>, DbError> {
        let rows = sqlx::query!(
            r#"SELECT o.id, o.user_login, o.status, o.uploaded_at, t.amount AS "amount?"
               FROM orders o
               LEFT JOIN transactions t ON t.order_number = o.id AND t.type = 'ACCRUAL'
               WHERE o.user_login = $1
               ORDER BY o.uploaded_at DESC"#,
            user_login,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    Order {
                        id: r.id,
                        user_login: r.user_login,
                        status: OrderStatus::from_str(&r.status).expect("status check constraint"),
                        uploaded_at: r.uploaded_at,
                    },
                    r.amount,
                )
            })
            .collect())
    }

    /// Update an order's status to a terminal value within the sink's
    /// transaction (§4.6 step 4).
    pub async fn set_terminal_status(
        tx: &mut SqlxTx<'_, Postgres>,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), DbError> {
        sqlx::query!(
            r#"UPDATE orders SET status = $2 WHERE id = $1"#,
            order_id,
            status.as_db_str(),
        )
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
