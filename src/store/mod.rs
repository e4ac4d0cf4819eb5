//! Persistence seams. Handlers and services only see the `UserStore` and
//! `ProductStore` traits; `PgStore` backs them with Postgres and
//! `MemoryStore` keeps everything in process.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::products::repo_types::{NewProduct, Product, ProductListing};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key (user email) already exists.
    #[error("duplicate key")]
    Conflict,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => StoreError::Conflict,
            other => StoreError::Backend(other.into()),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn create(
        &self,
        name: Option<&str>,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, newest `created_at` first, creators resolved.
    async fn list_newest_first(&self) -> Result<Vec<ProductListing>, StoreError>;
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Postgres-backed store. Trait impls live next to their feature in `auth::repo` and `products::repo`.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}
