use crate::api::{ApiContext, Messages};
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_sqlite::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Server {
    pub credential_service: Arc<dyn CredentialService>,
    pub api_context: Arc<ApiContext>,
    pool: Option<SqlitePool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let (user_repo, pool): (Arc<dyn UserRepo>, Option<SqlitePool>) =
            match settings.store.backend.as_str() {
                "sqlite" => {
                    let repo =
                        SqliteUserRepo::connect(&settings.store.url, settings.store.max_connections)
                            .await?;
                    repo.migrate().await?;
                    let pool = repo.pool().clone();
                    let repo: Arc<dyn UserRepo> = Arc::new(repo);
                    (repo, Some(pool))
                }
                "memory" => {
                    warn!("memory store selected, accounts are lost on shutdown");
                    let repo: Arc<dyn UserRepo> = Arc::new(MemoryUserRepo::new());
                    (repo, None)
                }
                other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
            };

        let credential_hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2PasswordHasher::new());
        let credential_service: Arc<dyn CredentialService> =
            Arc::new(RealCredentialService::new(user_repo, credential_hasher));

        let api_context = ApiContext::new(
            Messages::new(settings.api.locale),
            settings.api.expose_internal_errors,
        );

        info!(backend = %settings.store.backend, "server started");

        Ok(Self {
            credential_service,
            api_context: Arc::new(api_context),
            pool,
        })
    }

    /// Assemble a server from ready-made parts, without opening a store.
    pub fn from_parts(
        credential_service: Arc<dyn CredentialService>,
        api_context: ApiContext,
    ) -> Self {
        Self {
            credential_service,
            api_context: Arc::new(api_context),
            pool: None,
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("sqlite pool closed");
        }
    }
}
