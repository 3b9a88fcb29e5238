use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderStatus, PaymentSettlement},
    order_objects::OrderWithOwner,
};

/// Order storage and the order lifecycle operations that must be atomic at the database level.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Takes a new order and, in a single atomic transaction:
    /// * checks every referenced product exists and has sufficient stock,
    /// * decrements each product's stock with a conditional update (`stock >= quantity`), so that
    ///   concurrent checkouts cannot oversell,
    /// * captures each product's current title and price into the order lines,
    /// * persists the order in `pending` status with the computed total.
    ///
    /// If any line fails, the transaction rolls back and no stock is touched. There is no partial
    /// reservation.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;

    /// Fetches an order with its lines. Returns `None` if no such order exists. Ownership is not
    /// checked here; that is [`crate::OrderFlowApi::fetch_order_for`]'s job.
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderApiError>;

    /// All orders owned by the given user. No ordering guarantee.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError>;

    /// Every order in the system, each annotated with the owner's minimal identity (id and name).
    async fn fetch_all_orders(&self) -> Result<Vec<OrderWithOwner>, OrderApiError>;

    /// Sets the order status. `delivered` stamps `delivered_at`; `shipped` stamps `shipped_at`.
    /// Deliberately performs no transition validation: any status may be set from any other
    /// (administrative override). No stock or payment side effects.
    async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, OrderApiError>;

    /// Records a verified gateway payment against the order: sets `is_paid`, `paid_at`, the payment
    /// result, switches the payment method to the gateway, and moves the status to `approved`.
    ///
    /// Calling this on an order that is already paid is a no-op that returns the stored order
    /// unchanged.
    async fn settle_order_payment(&self, order_id: i64, settlement: PaymentSettlement)
        -> Result<Order, OrderApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No order items")]
    EmptyOrder,
    #[error("Product {0} not found")]
    ProductNotFound(i64),
    #[error("Not enough stock for {title}: {requested} requested, {available} available")]
    InsufficientStock { title: String, requested: i64, available: i64 },
    #[error("Invalid quantity: {0}. Order line quantities must be positive")]
    InvalidQuantity(i64),
    #[error("Order {0} not found")]
    OrderNotFound(i64),
    #[error("Not authorized to view this order")]
    NotAuthorized,
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}
