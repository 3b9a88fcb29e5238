use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderStatus, PaymentSettlement},
    order_objects::{OrderViewer, OrderWithOwner},
    traits::{OrderApiError, OrderManagement},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: checkout, reads, settlement and
/// status transitions.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Places a new order for the given user.
    ///
    /// The line list must be non-empty and every quantity positive; those checks happen here, before
    /// the database is touched. Availability checks, price capture and stock reservation happen
    /// inside a single transaction in the backend, so an order either reserves all of its stock or
    /// none of it.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        if order.lines.is_empty() {
            return Err(OrderApiError::EmptyOrder);
        }
        if let Some(line) = order.lines.iter().find(|l| l.quantity <= 0) {
            return Err(OrderApiError::InvalidQuantity(line.quantity));
        }
        let user_id = order.user_id;
        let order = self.db.create_order(order).await?;
        debug!("🛒️ Order #{} created for user #{user_id}. Total: {}", order.id, order.total);
        Ok(order)
    }

    /// Fetches an order on behalf of `viewer`. The owner may always read their own order; admins
    /// may read any order. Everyone else gets `NotAuthorized`, whether or not the order exists for
    /// them to see.
    pub async fn fetch_order_for(&self, order_id: i64, viewer: &OrderViewer) -> Result<Order, OrderApiError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderApiError::OrderNotFound(order_id))?;
        if !viewer.may_view(&order) {
            debug!("🛒️ User #{} may not view order #{order_id}", viewer.user_id);
            return Err(OrderApiError::NotAuthorized);
        }
        Ok(order)
    }

    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError> {
        self.db.fetch_orders_for_user(user_id).await
    }

    /// Administrative listing of every order, annotated with the owner's id and name.
    pub async fn all_orders(&self) -> Result<Vec<OrderWithOwner>, OrderApiError> {
        self.db.fetch_all_orders().await
    }

    /// Sets the order status. Any status may be set from any other; this is an administrative
    /// override, not a guarded state machine. `delivered` and `shipped` stamp their timestamps.
    pub async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, OrderApiError> {
        let order = self.db.update_order_status(order_id, status).await?;
        info!("🛒️ Order #{order_id} status updated to {status}");
        Ok(order)
    }

    /// Records a verified gateway payment against an order. Idempotent: settling an already-paid
    /// order changes nothing and returns the stored order.
    pub async fn settle_order_payment(
        &self,
        order_id: i64,
        settlement: PaymentSettlement,
    ) -> Result<Order, OrderApiError> {
        let payment_id = settlement.payment_id.clone();
        let order = self.db.settle_order_payment(order_id, settlement).await?;
        info!("🛒️ Order #{order_id} settled with gateway payment [{payment_id}]. Status: {}", order.status);
        Ok(order)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
