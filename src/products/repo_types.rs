use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Product as stored; `created_by` is the raw creator id.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Values needed to insert a product. The service stamps `created_at`.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

/// Public projection of the creating user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Creator {
    pub name: Option<String>,
    pub email: String,
}

/// Product as listed, with `created_by` resolved to the creator (or `null` when absent or dangling).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_by: Option<Creator>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ProductListing {
    pub fn new(product: Product, creator: Option<Creator>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            description: product.description,
            created_by: creator,
            created_at: product.created_at,
        }
    }
}

/// Row shape of the products ⟕ users join.
#[derive(Debug, FromRow)]
pub(crate) struct ProductListingRow {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub creator_name: Option<String>,
    pub creator_email: Option<String>,
}

impl From<ProductListingRow> for ProductListing {
    fn from(r: ProductListingRow) -> Self {
        let creator = r.creator_email.map(|email| Creator {
            name: r.creator_name,
            email,
        });
        let product = Product {
            id: r.id,
            name: r.name,
            price: r.price,
            description: r.description,
            created_by: r.created_by,
            created_at: r.created_at,
        };
        ProductListing::new(product, creator)
    }
}
