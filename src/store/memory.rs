use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProductStore, StoreError, UserStore};
use crate::auth::repo_types::User;
use crate::products::repo_types::{Creator, NewProduct, Product, ProductListing};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    users_by_email: HashMap<String, Uuid>,
    products: Vec<Product>, // insertion order
}

/// In-process store for `STORE_BACKEND=memory` and tests. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users_by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn create(
        &self,
        name: Option<&str>,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users_by_email.contains_key(email) {
            return Err(StoreError::Conflict);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.map(str::to_owned),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users_by_email.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_newest_first(&self) -> Result<Vec<ProductListing>, StoreError> {
        let inner = self.inner.read().await;
        // reverse first so the stable sort leaves later inserts ahead on equal timestamps
        let mut products: Vec<&Product> = inner.products.iter().rev().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products
            .into_iter()
            .map(|p| {
                let creator = p
                    .created_by
                    .and_then(|id| inner.users.get(&id))
                    .map(|u| Creator {
                        name: u.name.clone(),
                        email: u.email.clone(),
                    });
                ProductListing::new(p.clone(), creator)
            })
            .collect())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let row = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            description: product.description,
            created_by: product.created_by,
            created_at: product.created_at,
        };
        self.inner.write().await.products.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);
        Ok(inner.products.len() < before)
    }
}
