use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::db;
use crate::error::{AppError, Result};
use crate::repositories::{
    holiday_plan::HolidayPlanRepository, memory::MemoryStore, token::TokenRepository,
    user::UserRepository,
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The credential store: users.
    pub users: Arc<dyn UserRepository>,
    /// The credential store: bearer tokens.
    pub tokens: Arc<dyn TokenRepository>,
    /// The resource store.
    pub holiday_plans: Arc<dyn HolidayPlanRepository>,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState` backed by the configured storage engine.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::Postgres => {
                let database_url = config.database_url.as_deref().ok_or_else(|| {
                    AppError::Internal("DATABASE_URL is required for postgres".to_string())
                })?;
                let store = db::connect(database_url).await?;
                Ok(Self::with_store(Arc::new(store), config))
            }
            StorageBackend::Memory => {
                tracing::warn!("⚠️ Using in-memory storage, data will not survive a restart");
                Ok(Self::in_memory(config))
            }
        }
    }

    /// Creates an `AppState` over a fresh in-memory store.
    pub fn in_memory(config: &Config) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }

    fn with_store<S>(store: Arc<S>, config: &Config) -> Self
    where
        S: UserRepository + TokenRepository + HolidayPlanRepository + 'static,
    {
        Self {
            users: store.clone(),
            tokens: store.clone(),
            holiday_plans: store,
            config: config.clone(),
        }
    }
}
