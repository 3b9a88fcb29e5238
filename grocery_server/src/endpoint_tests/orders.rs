use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::Utc;
use grocery_engine::{
    db_types::{OrderStatus, PaymentMethod},
    order_objects::{OrderWithOwner, OwnerIdentity},
    traits::OrderApiError,
    OrderFlowApi,
};
use mockall::predicate::eq;
use serde_json::{json, Value};

use super::{
    helpers::{admin, customer, get_request, issue_token, post_request, put_request, sample_order},
    mocks::MockOrderManager,
};
use crate::routes::{AllOrdersRoute, CreateOrderRoute, MyOrdersRoute, OrderByIdRoute, UpdateOrderStatusRoute};

fn order_request_body() -> Value {
    json!({
        "items": [{ "productId": 7, "quantity": 3 }],
        "shippingAddress": {
            "address": "14 MG Road",
            "city": "Bengaluru",
            "postalCode": "560001",
            "phone": "+91 98450 00000"
        },
        "paymentMethod": "COD"
    })
}

#[actix_web::test]
async fn checkout_creates_a_pending_order() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let (status, body) = post_request(&token, "/api/orders", &order_request_body(), configure_create)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["isPaid"], false);
    assert_eq!(order["total"], 30.0);
    assert_eq!(order["items"][0]["unitPrice"], 10.0);
    assert_eq!(order["items"][0]["quantity"], 3);
}

#[actix_web::test]
async fn checkout_with_insufficient_stock_yields_400() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let (status, body) = post_request(&token, "/api/orders", &order_request_body(), configure_create_out_of_stock)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Not enough stock for Basmati rice 1kg"), "Got: {body}");
}

#[actix_web::test]
async fn an_owner_can_fetch_their_order() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let (status, body) = get_request(&token, "/api/orders/42", configure_fetch).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["id"], 42);
    assert_eq!(order["userId"], 1);
}

#[actix_web::test]
async fn a_non_owner_cannot_fetch_the_order() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(2));
    let (status, body) = get_request(&token, "/api/orders/42", configure_fetch).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Not authorized to view this order"), "Got: {body}");
}

#[actix_web::test]
async fn an_admin_can_fetch_any_order() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&admin(99));
    let (status, _) = get_request(&token, "/api/orders/42", configure_fetch).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn my_orders_lists_only_the_callers_orders() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let (status, body) = get_request(&token, "/api/orders/myorders", configure_my_orders).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.as_array().map(|a| a.len()), Some(2));
}

#[actix_web::test]
async fn the_admin_listing_requires_the_admin_role() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let err = get_request(&token, "/api/orders", configure_all_orders).await.expect_err("Expected error");
    assert!(err.contains("Insufficient Permissions"), "Got: {err}");
}

#[actix_web::test]
async fn the_admin_listing_carries_owner_identity() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&admin(99));
    let (status, body) = get_request(&token, "/api/orders", configure_all_orders).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(orders[0]["owner"]["name"], "Priya");
    assert_eq!(orders[0]["userId"], 1);
}

#[actix_web::test]
async fn a_status_update_with_an_unknown_status_is_rejected() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&admin(99));
    let body = json!({ "status": "teleported" });
    // The mock has no expectations; a call into the backend would panic the test
    let (status, body) = put_request(&token, "/api/orders/42/status", &body, configure_status_never_called)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid order status"), "Got: {body}");
}

#[actix_web::test]
async fn a_status_update_applies_and_returns_the_order() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&admin(99));
    let body = json!({ "status": "delivered" });
    let (status, body) =
        put_request(&token, "/api/orders/42/status", &body, configure_status_delivered).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], "delivered");
    assert!(!order["deliveredAt"].is_null());
}

#[actix_web::test]
async fn status_updates_require_the_admin_role() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let body = json!({ "status": "delivered" });
    let err = put_request(&token, "/api/orders/42/status", &body, configure_status_never_called)
        .await
        .expect_err("Expected error");
    assert!(err.contains("Insufficient Permissions"), "Got: {err}");
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_create_order().returning(|new_order| {
        let mut order = sample_order(1, new_order.user_id);
        order.payment_method = new_order.payment_method;
        Ok(order)
    });
    cfg.service(CreateOrderRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderFlowApi::new(orders)));
}

fn configure_create_out_of_stock(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_create_order().returning(|_| {
        Err(OrderApiError::InsufficientStock {
            title: "Basmati rice 1kg".to_string(),
            requested: 3,
            available: 2,
        })
    });
    cfg.service(CreateOrderRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderFlowApi::new(orders)));
}

fn configure_fetch(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order().with(eq(42)).returning(|id| Ok(Some(sample_order(id, 1))));
    cfg.service(OrderByIdRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderFlowApi::new(orders)));
}

fn configure_my_orders(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders
        .expect_fetch_orders_for_user()
        .with(eq(1))
        .returning(|user_id| Ok(vec![sample_order(1, user_id), sample_order(2, user_id)]));
    cfg.service(MyOrdersRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderFlowApi::new(orders)));
}

fn configure_all_orders(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_all_orders().returning(|| {
        let owner = OwnerIdentity { id: 1, name: "Priya".to_string(), email: None };
        Ok(vec![OrderWithOwner { order: sample_order(1, 1), owner }])
    });
    cfg.service(AllOrdersRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderFlowApi::new(orders)));
}

fn configure_status_never_called(cfg: &mut ServiceConfig) {
    let orders = MockOrderManager::new();
    cfg.service(UpdateOrderStatusRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(OrderFlowApi::new(orders)));
}

fn configure_status_delivered(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_update_order_status().with(eq(42), eq(OrderStatus::Delivered)).returning(|id, status| {
        let mut order = sample_order(id, 1);
        order.status = status;
        order.delivered_at = Some(Utc::now());
        order.payment_method = PaymentMethod::Cod;
        Ok(order)
    });
    cfg.service(UpdateOrderStatusRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(OrderFlowApi::new(orders)));
}
