use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewProduct, Product, ProductUpdate},
    traits::{CatalogApiError, CatalogManagement},
};

/// `CatalogApi` provides a unified API for reading and administering the product catalog.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn product_by_id(&self, product_id: i64) -> Result<Product, CatalogApiError> {
        self.db.fetch_product(product_id).await?.ok_or(CatalogApiError::ProductNotFound(product_id))
    }

    pub async fn products(&self) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_products().await
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        validate_price_and_stock(Some(&product.price), Some(product.stock))?;
        if product.title.trim().is_empty() {
            return Err(CatalogApiError::ValidationError("Title is required".to_string()));
        }
        let product = self.db.create_product(product).await?;
        info!("🏷️ Product #{} ({}) added to the catalog", product.id, product.title);
        Ok(product)
    }

    /// Applies a partial update. Changing the price only affects future orders; placed orders keep
    /// the price captured at order time.
    pub async fn update_product(&self, product_id: i64, update: ProductUpdate) -> Result<Product, CatalogApiError> {
        validate_price_and_stock(update.price.as_ref(), update.stock)?;
        let product = self.db.update_product(product_id, update).await?;
        debug!("🏷️ Product #{product_id} updated");
        Ok(product)
    }

    pub async fn delete_product(&self, product_id: i64) -> Result<(), CatalogApiError> {
        self.db.delete_product(product_id).await?;
        info!("🏷️ Product #{product_id} removed from the catalog");
        Ok(())
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

fn validate_price_and_stock(price: Option<&gsb_common::Rupees>, stock: Option<i64>) -> Result<(), CatalogApiError> {
    if let Some(price) = price {
        if price.is_negative() {
            return Err(CatalogApiError::ValidationError(format!("Price cannot be negative ({price})")));
        }
    }
    if let Some(stock) = stock {
        if stock < 0 {
            return Err(CatalogApiError::ValidationError(format!("Stock cannot be negative ({stock})")));
        }
    }
    Ok(())
}
