//! User repository (§3 User, created once with its Account atomically).

use sqlx::PgPool;

use super::DbError;

pub struct UserRepository;

impl UserRepository {
    /// Insert a user and its account in one transaction. Returns `Ok(false)`
    /// if the login already exists (unique-violation), without erroring.
    pub async fn create(pool: &PgPool, login: &str, password_hash: &str) -> Result<bool, DbError> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query!(
            r#"INSERT INTO users (login, password_hash) VALUES ($1, $2)
               ON CONFLICT (login) DO NOTHING"#,
            login,
            password_hash,
        )
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query!(
            r#"INSERT INTO accounts (user_login, balance, withdrawn) VALUES ($1, 0, 0)"#,
            login,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Fetch the password hash for a login, if the user exists.
    pub async fn password_hash(pool: &PgPool, login: &str) -> Result<Option<String>, DbError> {
        let row = sqlx::query!(
            r#"SELECT password_hash FROM users WHERE login = $1"#,
            login,
        )
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| r.password_hash))
    }

    pub async fn exists(pool: &PgPool, login: &str) -> Result<bool, DbError> {
        let row = sqlx::query!(r#"SELECT 1 AS "one!" FROM users WHERE login = $1"#, login)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}
