use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::store::{MemoryStore, PgStore, ProductStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub keys: JwtKeys,
}

impl AppState {
    /// Connects the configured backend (running migrations for Postgres).
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        match &config.store {
            StoreBackend::Postgres { database_url } => {
                let pool = db::connect(database_url).await?;
                db::migrate(&pool).await?;
                let store = Arc::new(PgStore::new(pool));
                Ok(Self::from_parts(config, store.clone(), store))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store)
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            config: Arc::new(config),
            users,
            products,
            keys,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::config::{Environment, JwtConfig};

    AppState::in_memory(AppConfig {
        store: StoreBackend::Memory,
        jwt: JwtConfig {
            secret: "test".into(),
            secret_is_fallback: false,
            ttl_days: 7,
        },
        host: "127.0.0.1".into(),
        port: 0,
        environment: Environment::Development,
        static_dir: "static".into(),
    })
}
