use std::fmt::Debug;

use log::*;

use crate::{
    order_objects::DashboardStats,
    traits::{OrderApiError, ShopReporting},
};

const RECENT_ORDER_COUNT: i64 = 5;

/// `ReportApi` assembles the admin dashboard read model.
pub struct ReportApi<B> {
    db: B,
}

impl<B> Debug for ReportApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReportApi")
    }
}

impl<B> ReportApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReportApi<B>
where B: ShopReporting
{
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, OrderApiError> {
        let total_orders = self.db.count_orders().await?;
        let total_products = self.db.count_products().await?;
        let total_users = self.db.count_customers().await?;
        let total_revenue = self.db.total_revenue().await?;
        let recent_orders = self.db.recent_orders(RECENT_ORDER_COUNT).await?;
        debug!("📊️ Dashboard stats: {total_orders} orders, {total_products} products, revenue {total_revenue}");
        Ok(DashboardStats { total_orders, total_products, total_users, total_revenue, recent_orders })
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
