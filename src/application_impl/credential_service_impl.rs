use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

pub struct RealCredentialService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
}

impl RealCredentialService {
    pub fn new(user_repo: Arc<dyn UserRepo>, credential_hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            user_repo,
            credential_hasher,
        }
    }
}

#[async_trait::async_trait]
impl CredentialService for RealCredentialService {
    async fn register(&self, request: RegisterInput) -> Result<UserAccount, CredentialError> {
        let RegisterInput { username, password } = request;

        let password_hash = self.credential_hasher.hash_password(&password).await?;
        let account = NewUserAccount {
            username,
            password_hash,
        };

        // Racing registrations are settled by the store's unique index.
        match self.user_repo.insert(account).await {
            Ok(account) => {
                info!(user_id = %account.id, username = %account.username, "user registered");
                Ok(account)
            }
            Err(StoreError::UniqueViolation(constraint)) => {
                debug!(%constraint, "registration rejected, username taken");
                Err(CredentialError::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn login(&self, request: LoginInput) -> Result<UserAccount, CredentialError> {
        let LoginInput { username, password } = request;

        let account = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or(CredentialError::NotFound)?;

        let ok = self
            .credential_hasher
            .verify_password(&password, &account.password_hash)
            .await?;
        if !ok {
            debug!(user_id = %account.id, "login rejected, password mismatch");
            return Err(CredentialError::InvalidCredentials);
        }

        info!(user_id = %account.id, username = %account.username, "user logged in");
        Ok(account)
    }
}
