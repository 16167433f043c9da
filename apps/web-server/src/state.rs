//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PasswordService, TokenService};
use quill_core::services::Services;
use quill_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConnections;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub tokens: Arc<dyn TokenService>,
    #[cfg(feature = "postgres")]
    pub db: Option<DatabaseConnections>,
    pub default_page_size: i64,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone())?);
        let passwords: Arc<dyn PasswordService> =
            Arc::new(Argon2PasswordService::new(&config.password)?);

        #[cfg(feature = "postgres")]
        let (db, repos) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    if config.auto_migrate {
                        use migration::MigratorTrait;
                        migration::Migrator::up(&connections.main, None).await?;
                        tracing::info!("Database schema is up to date");
                    }
                    let repos = connections.repositories();
                    (Some(connections), repos)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, InMemoryStore::new().repositories())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, InMemoryStore::new().repositories())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            InMemoryStore::new().repositories()
        };

        tracing::info!("Application state initialized");

        Ok(Self {
            services: Services::new(repos, passwords),
            tokens,
            #[cfg(feature = "postgres")]
            db,
            default_page_size: config.default_page_size,
        })
    }

    /// State on fresh in-memory repositories.
    #[cfg(test)]
    pub fn in_memory(tokens: Arc<dyn TokenService>, default_page_size: i64) -> Self {
        Self {
            services: Services::new(
                InMemoryStore::new().repositories(),
                Arc::new(Argon2PasswordService::default()),
            ),
            tokens,
            #[cfg(feature = "postgres")]
            db: None,
            default_page_size,
        }
    }

    /// Name of the active storage backend, for the health report.
    pub fn storage(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        if self.db.is_some() {
            return "postgres";
        }
        "memory"
    }
}
