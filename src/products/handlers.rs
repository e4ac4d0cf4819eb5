use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateProductRequest, MessageResponse},
    repo_types::{Product, ProductListing},
    services,
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", delete(delete_product))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductListing>>, AppError> {
    Ok(Json(services::list_products(&state).await?))
}

#[instrument(skip(state, payload), fields(user_id = %user.id))]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let Json(req) = payload?;
    let product = services::create_product(&state, user.id, req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    // an id that can't exist is just another missing product
    let id = Uuid::parse_str(&id).map_err(|_| AppError::NotFound("Not found".into()))?;
    services::delete_product(&state, id, user.id).await?;
    Ok(Json(MessageResponse {
        message: "Deleted".into(),
    }))
}
