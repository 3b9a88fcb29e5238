use grocery_engine::{
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
use gsb_common::Rupees;
use mockall::mock;

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderApiError>;
        async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError>;
        async fn fetch_all_orders(&self) -> Result<Vec<OrderWithOwner>, OrderApiError>;
        async fn update_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, OrderApiError>;
        async fn settle_order_payment(&self, order_id: i64, settlement: PaymentSettlement) -> Result<Order, OrderApiError>;
    }
}

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError>;
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError>;
        async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;
        async fn update_product(&self, product_id: i64, update: ProductUpdate) -> Result<Product, CatalogApiError>;
        async fn delete_product(&self, product_id: i64) -> Result<(), CatalogApiError>;
    }
}

mock! {
    pub UserManager {}
    impl UserManagement for UserManager {
        async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError>;
        async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, AuthApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError>;
        async fn update_user(&self, user_id: i64, update: UserUpdate) -> Result<User, AuthApiError>;
    }
}

mock! {
    pub Reporter {}
    impl ShopReporting for Reporter {
        async fn count_orders(&self) -> Result<i64, OrderApiError>;
        async fn count_products(&self) -> Result<i64, OrderApiError>;
        async fn count_customers(&self) -> Result<i64, OrderApiError>;
        async fn total_revenue(&self) -> Result<Rupees, OrderApiError>;
        async fn recent_orders(&self, limit: i64) -> Result<Vec<OrderWithOwner>, OrderApiError>;
    }
}
