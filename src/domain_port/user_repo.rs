use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("store error: {0}")]
    Backend(String),
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a row. Fails with `StoreError::UniqueViolation` when the username is taken.
    async fn insert(&self, account: NewUserAccount) -> Result<UserAccount, StoreError>;

    /// Fetch an account by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Remove the account with this username, returning the number of rows removed.
    /// The credential service never calls this; it exists for fixtures and maintenance.
    async fn delete_by_username(&self, username: &str) -> Result<u64, StoreError>;
}
