use crate::domain_model::UserAccount;
use crate::domain_port::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("username already exists")]
    Conflict,
    #[error("user does not exist")]
    NotFound,
    #[error("incorrect password")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Clone)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, CredentialError>;
    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, CredentialError>;
}

#[async_trait::async_trait]
pub trait CredentialService: Send + Sync {
    /// Hash the password and store a new account under `username`.
    async fn register(&self, request: RegisterInput) -> Result<UserAccount, CredentialError>;

    /// Return the stored account when `password` matches its hash.
    async fn login(&self, request: LoginInput) -> Result<UserAccount, CredentialError>;
}
