use gsb_common::Rupees;

use crate::{order_objects::OrderWithOwner, traits::OrderApiError};

/// Read-only aggregates for the admin dashboard.
#[allow(async_fn_in_trait)]
pub trait ShopReporting {
    async fn count_orders(&self) -> Result<i64, OrderApiError>;

    async fn count_products(&self) -> Result<i64, OrderApiError>;

    /// The number of customer accounts. Admin accounts are not counted.
    async fn count_customers(&self) -> Result<i64, OrderApiError>;

    /// The sum of order totals over paid orders that have progressed past `pending` and were not
    /// cancelled.
    async fn total_revenue(&self) -> Result<Rupees, OrderApiError>;

    /// The most recently created orders, newest first, annotated with owner identity.
    async fn recent_orders(&self, limit: i64) -> Result<Vec<OrderWithOwner>, OrderApiError>;
}
