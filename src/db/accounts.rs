//! Account repository (§3 Account, §4.6/§4.7 write-lock discipline).

use sqlx::{PgPool, Postgres, Transaction as SqlxTx};

use super::{Account, DbError};

pub struct AccountRepository;

impl AccountRepository {
    pub async fn get(pool: &PgPool, user_login: &str) -> Result<Account, DbError> {
        let row = sqlx::query!(
            r#"SELECT user_login, balance, withdrawn FROM accounts WHERE user_login = $1"#,
            user_login,
        )
        .fetch_one(pool)
        .await?;

        Ok(Account {
            user_login: row.user_login,
            balance: row.balance,
            withdrawn: row.withdrawn,
        })
    }

    /// Lock the account row for update within an existing transaction. This
    /// is the account write-lock referenced throughout §4 and §5: the sink
    /// and withdraw both take it before mutating balance/withdrawn so
    /// concurrent calls for the same user serialize.
    pub async fn lock_for_update(
        tx: &mut SqlxTx<'_, Postgres>,
        user_login: &str,
    ) -> Result<Account, DbError> {
        let row = sqlx::query!(
            r#"SELECT user_login, balance, withdrawn FROM accounts WHERE user_login = $1 FOR UPDATE"#,
            user_login,
        )
        .fetch_one(&mut **tx)
        .await?;

        Ok(Account {
            user_login: row.user_login,
            balance: row.balance,
            withdrawn: row.withdrawn,
        })
    }

    pub async fn credit_accrual(
        tx: &mut SqlxTx<'_, Postgres>,
        user_login: &str,
        amount: i64,
    ) -> Result<(), DbError> {
        sqlx::query!(
            r#"UPDATE accounts SET balance = balance + $2 WHERE user_login = $1"#,
            user_login,
            amount,
        )
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn debit_withdrawal(
        tx: &mut SqlxTx<'_, Postgres>,
        user_login: &str,
        amount: i64,
    ) -> Result<(), DbError> {
        sqlx::query!(
            r#"UPDATE accounts SET balance = balance - $2, withdrawn = withdrawn + $2
               WHERE user_login = $1"#,
            user_login,
            amount,
        )
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
