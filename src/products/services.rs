use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::CreateProductRequest;
use super::repo_types::{NewProduct, Product, ProductListing};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_products(st: &AppState) -> Result<Vec<ProductListing>, AppError> {
    Ok(st.products.list_newest_first().await?)
}

pub async fn create_product(
    st: &AppState,
    creator_id: Uuid,
    req: CreateProductRequest,
) -> Result<Product, AppError> {
    let (Some(name), Some(price)) = (req.name.filter(|n| !n.is_empty()), req.price) else {
        return Err(AppError::BadRequest("Name and price required".into()));
    };

    let product = st
        .products
        .insert(NewProduct {
            name,
            price,
            description: req.description,
            created_by: Some(creator_id),
            created_at: OffsetDateTime::now_utc(),
        })
        .await?;

    info!(product_id = %product.id, user_id = %creator_id, "product created");
    Ok(product)
}

/// Only the creator may delete; a product without a creator is deletable by anyone.
pub async fn delete_product(st: &AppState, id: Uuid, requester_id: Uuid) -> Result<(), AppError> {
    let product = st
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".into()))?;

    if let Some(owner) = product.created_by {
        if owner != requester_id {
            warn!(product_id = %id, user_id = %requester_id, "delete by non-owner");
            return Err(AppError::Forbidden("Forbidden".into()));
        }
    }

    st.products.delete(id).await?;
    info!(product_id = %id, user_id = %requester_id, "product deleted");
    Ok(())
}
