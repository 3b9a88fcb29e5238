use gsb_common::Rupees;
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, Role, User};

/// The identity on whose behalf an order is being read. Built from the verified request identity;
/// the engine never consults ambient state to decide authorization.
#[derive(Debug, Clone, Copy)]
pub struct OrderViewer {
    pub user_id: i64,
    pub is_admin: bool,
}

impl OrderViewer {
    pub fn new(user_id: i64, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    /// Owner-or-admin, applied uniformly to order reads and invoice rendering.
    pub fn may_view(&self, order: &Order) -> bool {
        self.is_admin || order.user_id == self.user_id
    }
}

/// The minimal owner identity attached to administrative order listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerIdentity {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&User> for OwnerIdentity {
    fn from(user: &User) -> Self {
        Self { id: user.id, name: user.name.clone(), email: Some(user.email.clone()) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithOwner {
    #[serde(flatten)]
    pub order: Order,
    pub owner: OwnerIdentity,
}

/// The admin dashboard read model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: i64,
    pub total_products: i64,
    /// Customer accounts only; staff accounts are excluded.
    pub total_users: i64,
    pub total_revenue: Rupees,
    pub recent_orders: Vec<OrderWithOwner>,
}

/// The profile shape returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self { id: user.id, name: user.name.clone(), email: user.email.clone(), role: user.role }
    }
}
