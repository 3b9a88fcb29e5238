//! Grocery Store Engine
//!
//! This library holds the business logic for the grocery store backend: the product catalog, order
//! placement with inventory reservation, payment settlement, and user accounts.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should
//!    never need to access the database directly; use the public API instead. The exception is the
//!    data types used in the database, which are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@shop_api`]). `OrderFlowApi` drives order creation, settlement
//!    and status transitions, `CatalogApi` manages products, `AuthApi` manages user accounts and
//!    credentials, and `ReportApi` aggregates the admin dashboard figures. Each API is generic
//!    over the storage traits in [`mod@traits`], so that servers and tests can swap the backend.

pub mod db_types;
pub mod shop_api;
mod sqlite;
pub mod traits;

pub mod test_utils;

pub use shop_api::{
    auth_api::AuthApi,
    catalog_api::CatalogApi,
    order_flow_api::OrderFlowApi,
    order_objects,
    report_api::ReportApi,
};
pub use sqlite::SqliteDatabase;
