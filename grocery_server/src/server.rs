use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use grocery_engine::{AuthApi, CatalogApi, OrderFlowApi, ReportApi, SqliteDatabase};
use log::*;

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    gateway::GatewayHandle,
    routes::{
        health,
        AllOrdersRoute,
        CreateOrderRoute,
        CreatePaymentIntentRoute,
        CreateProductRoute,
        DashboardStatsRoute,
        DeleteProductRoute,
        LoginRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        OrderInvoiceRoute,
        ProductByIdRoute,
        ProductsRoute,
        ProfileRoute,
        RegisterRoute,
        UpdateOrderStatusRoute,
        UpdateProductRoute,
        UpdateProfileRoute,
        VerifyPaymentRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Database schema is up to date");
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let (host, port) = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let report_api = ReportApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let gateway = GatewayHandle::new(config.razorpay.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("gsb::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(report_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(gateway))
            .service(health)
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(ProfileRoute::<SqliteDatabase>::new())
            .service(UpdateProfileRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(AllOrdersRoute::<SqliteDatabase>::new())
            // my_orders must be registered before the {id} routes so that "myorders" is not
            // captured as an order id
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(OrderInvoiceRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(CreatePaymentIntentRoute::new())
            .service(VerifyPaymentRoute::<SqliteDatabase>::new())
            .service(DashboardStatsRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
