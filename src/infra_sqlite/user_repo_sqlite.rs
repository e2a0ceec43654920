use super::util::store_error;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

/// The column default for `balance` is `DEFAULT_BALANCE`.
fn schema() -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS user (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT    NOT NULL UNIQUE,
    password_hash TEXT    NOT NULL,
    balance       REAL    NOT NULL DEFAULT {DEFAULT_BALANCE:?}
)
"#
    )
}

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteUserRepo { pool }
    }

    /// Open a pool on `url`, creating the database file and its parent directories when
    /// they are missing.
    /// `sqlite::memory:` gives every connection its own database, so use one connection.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(store_error)?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    StoreError::Backend(format!("create {}: {e}", parent.display()))
                })?;
            }
        }
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(store_error)?;

        debug!(url, max_connections, "sqlite pool opened");
        Ok(Self::new(pool))
    }

    /// Create the `user` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(&schema())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_account(row: SqliteRow) -> Result<UserAccount, StoreError> {
        let id: UserId = row.try_get("id").map_err(store_error)?;
        let username: String = row.try_get("username").map_err(store_error)?;
        let password_hash: String = row.try_get("password_hash").map_err(store_error)?;
        let balance: f64 = row.try_get("balance").map_err(store_error)?;

        Ok(UserAccount {
            id,
            username,
            password_hash,
            balance,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for SqliteUserRepo {
    async fn insert(&self, account: NewUserAccount) -> Result<UserAccount, StoreError> {
        let row = sqlx::query(
            r#"
INSERT INTO user (username, password_hash)
VALUES (?, ?)
RETURNING id, username, password_hash, balance
"#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Self::row_to_account(row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let row_opt: Option<SqliteRow> = sqlx::query(
            r#"
SELECT id, username, password_hash, balance
FROM user
WHERE username = ?
"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row_opt.map(Self::row_to_account).transpose()
    }

    async fn delete_by_username(&self, username: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM user WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected())
    }
}
