use thiserror::Error;

use crate::db_types::{NewProduct, Product, ProductUpdate};

/// Product catalog storage. Reads are public-facing; mutations are reserved for admin callers and,
/// in the case of stock decrements, for the order flow (see [`super::OrderManagement`]).
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError>;

    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    /// Applies the non-`None` fields of `update` to the product. Returns the updated record, or
    /// [`CatalogApiError::ProductNotFound`] if no such product exists.
    async fn update_product(&self, product_id: i64, update: ProductUpdate) -> Result<Product, CatalogApiError>;

    async fn delete_product(&self, product_id: i64) -> Result<(), CatalogApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Product {0} not found")]
    ProductNotFound(i64),
    #[error("Invalid product data. {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}
