use async_trait::async_trait;
use uuid::Uuid;

use crate::products::repo_types::{NewProduct, Product, ProductListing, ProductListingRow};
use crate::store::{PgStore, ProductStore, StoreError};

// `seq` is a BIGSERIAL, so later inserts win on equal timestamps.
const LIST_NEWEST_FIRST: &str = r#"
    SELECT p.id, p.name, p.price, p.description, p.created_by, p.created_at,
           u.name AS creator_name, u.email AS creator_email
    FROM products p
    LEFT JOIN users u ON u.id = p.created_by
    ORDER BY p.created_at DESC, p.seq DESC
"#;

#[async_trait]
impl ProductStore for PgStore {
    async fn list_newest_first(&self) -> Result<Vec<ProductListing>, StoreError> {
        let rows = sqlx::query_as::<_, ProductListingRow>(LIST_NEWEST_FIRST)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(ProductListing::from).collect())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, price, description, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, price, description, created_by, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .bind(product.created_by) // Option<Uuid> → NULL allowed
        .bind(product.created_at)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, created_by, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::LIST_NEWEST_FIRST;

    #[test]
    fn listing_breaks_timestamp_ties_by_insert_order() {
        let order_by = LIST_NEWEST_FIRST
            .split("ORDER BY")
            .nth(1)
            .map(str::trim)
            .unwrap();
        assert_eq!(order_by, "p.created_at DESC, p.seq DESC");
    }
}
