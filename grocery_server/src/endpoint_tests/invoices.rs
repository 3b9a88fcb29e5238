use actix_web::{http::StatusCode, web, web::ServiceConfig};
use grocery_engine::{AuthApi, OrderFlowApi};
use mockall::predicate::eq;

use super::{
    helpers::{admin, customer, get_request, issue_token, sample_order},
    mocks::{MockOrderManager, MockUserManager},
};
use crate::routes::OrderInvoiceRoute;

#[actix_web::test]
async fn the_owner_can_download_their_invoice() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let (status, body) = get_request(&token, "/api/orders/42/invoice", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    // A PDF body, not JSON
    let preview: String = body.chars().take(32).collect();
    assert!(body.starts_with("%PDF"), "Expected a PDF document, got: {preview}");
}

#[actix_web::test]
async fn an_admin_can_download_any_invoice() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&admin(99));
    let (status, _) = get_request(&token, "/api/orders/42/invoice", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn a_non_owner_cannot_download_the_invoice() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(2));
    let (status, body) = get_request(&token, "/api/orders/42/invoice", configure_never_renders)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Not authorized to view this order"), "Got: {body}");
}

fn configure(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order().with(eq(42)).returning(|id| Ok(Some(sample_order(id, 1))));
    let mut users = MockUserManager::new();
    users.expect_fetch_user().with(eq(1)).returning(|id| Ok(Some(customer(id))));
    cfg.service(OrderInvoiceRoute::<MockOrderManager, MockUserManager>::new())
        .app_data(web::Data::new(OrderFlowApi::new(orders)))
        .app_data(web::Data::new(AuthApi::new(users)));
}

fn configure_never_renders(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_order().with(eq(42)).returning(|id| Ok(Some(sample_order(id, 1))));
    // No fetch_user expectation: the ownership check must fail before the owner profile is read
    let users = MockUserManager::new();
    cfg.service(OrderInvoiceRoute::<MockOrderManager, MockUserManager>::new())
        .app_data(web::Data::new(OrderFlowApi::new(orders)))
        .app_data(web::Data::new(AuthApi::new(users)));
}
