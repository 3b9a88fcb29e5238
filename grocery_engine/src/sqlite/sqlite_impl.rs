//! `SqliteDatabase` is the concrete storage backend for the grocery store engine.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use gsb_common::Rupees;
use log::*;
use sqlx::SqlitePool;

use super::db::{self, orders, products, users};
use crate::{
    db_types::{
        NewOrder,
        NewProduct,
        NewUser,
        Order,
        OrderStatus,
        PaymentSettlement,
        Product,
        ProductUpdate,
        User,
        UserUpdate,
    },
    order_objects::OrderWithOwner,
    traits::{
        AuthApiError,
        CatalogApiError,
        CatalogManagement,
        OrderApiError,
        OrderManagement,
        ShopReporting,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = db::new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Called once at server start and by the test environment setup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let mut captured = Vec::with_capacity(order.lines.len());
        let mut total = Rupees::default();
        for line in &order.lines {
            let product = products::fetch_product(line.product_id, &mut tx)
                .await?
                .ok_or(OrderApiError::ProductNotFound(line.product_id))?;
            if product.stock < line.quantity {
                // Dropping the transaction rolls back any decrements from earlier lines
                return Err(OrderApiError::InsufficientStock {
                    title: product.title,
                    requested: line.quantity,
                    available: product.stock,
                });
            }
            let reserved = products::decrement_stock(line.product_id, line.quantity, &mut tx).await?;
            if !reserved {
                return Err(OrderApiError::InsufficientStock {
                    title: product.title,
                    requested: line.quantity,
                    available: product.stock,
                });
            }
            total += product.price * line.quantity;
            captured.push((line.product_id, product.title, line.quantity, product.price));
        }
        let row = orders::insert_order(order.user_id, total, &order.shipping_address, order.payment_method, &mut tx)
            .await?;
        let order_id = row.id;
        let mut lines = Vec::with_capacity(captured.len());
        for (product_id, title, quantity, unit_price) in captured {
            let line = orders::insert_order_line(order_id, product_id, &title, quantity, unit_price, &mut tx).await?;
            lines.push(line);
        }
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} and its {} lines have been saved in the DB", lines.len());
        row.into_order(lines)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order(order_id, &mut conn).await
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_user(user_id, &mut conn).await
    }

    async fn fetch_all_orders(&self) -> Result<Vec<OrderWithOwner>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_all_orders_with_owner(&mut conn).await
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(order_id, status, &mut conn).await
    }

    async fn settle_order_payment(
        &self,
        order_id: i64,
        settlement: PaymentSettlement,
    ) -> Result<Order, OrderApiError> {
        // The read (is it already paid?) and the write run in one transaction so that two
        // concurrent settlement callbacks cannot both apply.
        let mut tx = self.pool.begin().await?;
        let order = orders::settle_order(order_id, settlement, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(product_id, &mut conn).await.map_err(Into::into)
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_all_products(&mut conn).await.map_err(Into::into)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn update_product(&self, product_id: i64, update: ProductUpdate) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::update_product(product_id, update, &mut conn)
            .await?
            .ok_or(CatalogApiError::ProductNotFound(product_id))
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = products::delete_product(product_id, &mut conn).await?;
        if deleted {
            Ok(())
        } else {
            Err(CatalogApiError::ProductNotFound(product_id))
        }
    }
}

impl UserManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_id(user_id, &mut conn).await.map_err(Into::into)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_email(email, &mut conn).await.map_err(Into::into)
    }

    async fn update_user(&self, user_id: i64, update: UserUpdate) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_user(user_id, update, &mut conn).await?.ok_or(AuthApiError::UserNotFound)
    }
}

impl ShopReporting for SqliteDatabase {
    async fn count_orders(&self) -> Result<i64, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::count_orders(&mut conn).await.map_err(Into::into)
    }

    async fn count_products(&self) -> Result<i64, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        products::count_products(&mut conn).await.map_err(Into::into)
    }

    async fn count_customers(&self) -> Result<i64, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        users::count_customers(&mut conn).await.map_err(Into::into)
    }

    async fn total_revenue(&self) -> Result<Rupees, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::total_revenue(&mut conn).await.map_err(Into::into)
    }

    async fn recent_orders(&self, limit: i64) -> Result<Vec<OrderWithOwner>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_recent_orders(limit, &mut conn).await
    }
}
