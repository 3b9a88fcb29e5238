use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use grocery_engine::{db_types::Product, CatalogApi};
use gsb_common::Rupees;
use serde_json::{json, Value};

use super::{
    helpers::{admin, customer, get_request, issue_token, post_request},
    mocks::MockCatalogManager,
};
use crate::routes::{CreateProductRoute, ProductByIdRoute, ProductsRoute};

fn sample_product(id: i64) -> Product {
    let created = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
    Product {
        id,
        title: "Basmati rice 1kg".to_string(),
        description: Some("Long grain".to_string()),
        image: None,
        price: Rupees::from_rupees(10),
        stock: 5,
        created_at: created,
        updated_at: created,
    }
}

#[actix_web::test]
async fn the_product_listing_is_public() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/api/products", configure_list).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let products: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(products[0]["title"], "Basmati rice 1kg");
    assert_eq!(products[0]["price"], 10.0);
    assert_eq!(products[0]["stock"], 5);
}

#[actix_web::test]
async fn an_unknown_product_yields_404() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/api/products/999", configure_missing).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Product 999 not found"), "Got: {body}");
}

#[actix_web::test]
async fn creating_a_product_requires_the_admin_role() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let body = json!({ "title": "Ghee 500ml", "price": 45.0, "stock": 10 });
    let err = post_request(&token, "/api/products", &body, configure_create).await.expect_err("Expected error");
    assert!(err.contains("Insufficient Permissions"), "Got: {err}");
}

#[actix_web::test]
async fn an_admin_can_create_a_product() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&admin(99));
    let body = json!({ "title": "Ghee 500ml", "price": 45.0, "stock": 10 });
    let (status, body) = post_request(&token, "/api/products", &body, configure_create).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let product: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(product["title"], "Ghee 500ml");
    assert_eq!(product["price"], 45.0);
}

#[actix_web::test]
async fn a_negative_price_is_rejected_before_the_backend() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&admin(99));
    let body = json!({ "title": "Ghee 500ml", "price": -45.0, "stock": 10 });
    // The mock has no expectations; a call into the backend would panic the test
    let (status, body) =
        post_request(&token, "/api/products", &body, configure_create_never_called).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Price cannot be negative"), "Got: {body}");
}

fn configure_list(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_products().returning(|| Ok(vec![sample_product(1), sample_product(2)]));
    cfg.service(ProductsRoute::<MockCatalogManager>::new()).app_data(web::Data::new(CatalogApi::new(catalog)));
}

fn configure_missing(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_product().returning(|_| Ok(None));
    cfg.service(ProductByIdRoute::<MockCatalogManager>::new()).app_data(web::Data::new(CatalogApi::new(catalog)));
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogManager::new();
    catalog.expect_create_product().returning(|new_product| {
        let mut product = sample_product(3);
        product.title = new_product.title;
        product.price = new_product.price;
        product.stock = new_product.stock;
        product.description = new_product.description;
        Ok(product)
    });
    cfg.service(CreateProductRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}

fn configure_create_never_called(cfg: &mut ServiceConfig) {
    let catalog = MockCatalogManager::new();
    cfg.service(CreateProductRoute::<MockCatalogManager>::new())
        .app_data(web::Data::new(CatalogApi::new(catalog)));
}
