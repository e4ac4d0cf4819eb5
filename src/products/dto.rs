use serde::{Deserialize, Serialize};

/// POST /api/products body. `price: 0` is valid; only absent/`null` is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
