use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::Utc;
use grocery_engine::{
    db_types::{OrderStatus, PaymentMethod, PaymentResult},
    OrderFlowApi,
};
use gsb_common::Secret;
use mockall::predicate::eq;
use razorpay_tools::{helpers::payment_signature, RazorpayApi, RazorpayConfig};
use serde_json::{json, Value};

use super::{
    helpers::{customer, issue_token, post_request, sample_order},
    mocks::MockOrderManager,
};
use crate::{
    gateway::GatewayHandle,
    routes::{CreatePaymentIntentRoute, VerifyPaymentRoute},
};

const TEST_KEY_SECRET: &str = "endpoint-test-gateway-secret";

fn test_gateway() -> GatewayHandle {
    let config = RazorpayConfig::new("rzp_test_key", Secret::new(TEST_KEY_SECRET.to_string()));
    GatewayHandle::from_api(RazorpayApi::new(config).expect("Failed to build gateway client"))
}

fn verify_body(signature: &str) -> Value {
    json!({
        "orderId": 42,
        "razorpay_payment_id": "pay_123",
        "razorpay_order_id": "order_G1",
        "razorpay_signature": signature
    })
}

#[actix_web::test]
async fn a_valid_signature_settles_the_order() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let signature = payment_signature("order_G1", "pay_123", TEST_KEY_SECRET);
    let (status, body) = post_request(&token, "/api/payments/verify", &verify_body(&signature), configure_verify)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["isPaid"], true);
    assert_eq!(order["status"], "approved");
    assert!(!order["paidAt"].is_null());
    assert_eq!(order["paymentResult"]["id"], "pay_123");
    assert_eq!(order["paymentResult"]["email_address"], "priya@example.com");
}

#[actix_web::test]
async fn a_tampered_signature_is_rejected_and_the_order_is_untouched() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let signature = payment_signature("order_G1", "pay_999", TEST_KEY_SECRET);
    // The mock has no settle expectation; a call into the backend would panic the test
    let (status, body) =
        post_request(&token, "/api/payments/verify", &verify_body(&signature), configure_verify_never_settles)
            .await
            .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("invalid signature"), "Got: {body}");
}

#[actix_web::test]
async fn missing_payment_fields_are_rejected() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let body = json!({ "orderId": 42, "razorpay_payment_id": "pay_123" });
    let (status, body) =
        post_request(&token, "/api/payments/verify", &body, configure_verify_never_settles).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("razorpay_order_id"), "Got: {body}");
}

#[actix_web::test]
async fn a_payment_intent_without_an_amount_is_rejected() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let body = json!({ "currency": "INR" });
    let (status, body) =
        post_request(&token, "/api/payments/razorpay", &body, configure_intent).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Amount is required"), "Got: {body}");
}

#[actix_web::test]
async fn a_non_positive_amount_is_rejected() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let body = json!({ "amount": -50.0 });
    let (status, body) =
        post_request(&token, "/api/payments/razorpay", &body, configure_intent).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not a positive amount"), "Got: {body}");
}

#[actix_web::test]
async fn gateway_operations_report_missing_configuration() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let body = json!({ "amount": 15075.0 });
    let (status, body) =
        post_request(&token, "/api/payments/razorpay", &body, configure_intent_unconfigured).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("not configured"), "Got: {body}");
}

fn settled_order() -> grocery_engine::db_types::Order {
    let mut order = sample_order(42, 1);
    order.is_paid = true;
    order.status = OrderStatus::Approved;
    order.paid_at = Some(Utc::now());
    order.payment_method = PaymentMethod::Razorpay;
    order.payment_result = Some(PaymentResult {
        id: "pay_123".to_string(),
        status: "completed".to_string(),
        update_time: Utc::now(),
        email_address: "priya@example.com".to_string(),
    });
    order
}

fn configure_verify(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_settle_order_payment().with(eq(42), mockall::predicate::always()).returning(|_, settlement| {
        assert_eq!(settlement.payment_id, "pay_123");
        assert_eq!(settlement.gateway_order_id, "order_G1");
        assert_eq!(settlement.payer_email, "priya@example.com");
        Ok(settled_order())
    });
    cfg.service(VerifyPaymentRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(OrderFlowApi::new(orders)))
        .app_data(web::Data::new(test_gateway()));
}

fn configure_verify_never_settles(cfg: &mut ServiceConfig) {
    let orders = MockOrderManager::new();
    cfg.service(VerifyPaymentRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(OrderFlowApi::new(orders)))
        .app_data(web::Data::new(test_gateway()));
}

fn configure_intent(cfg: &mut ServiceConfig) {
    cfg.service(CreatePaymentIntentRoute::new()).app_data(web::Data::new(test_gateway()));
}

fn configure_intent_unconfigured(cfg: &mut ServiceConfig) {
    cfg.service(CreatePaymentIntentRoute::new()).app_data(web::Data::new(GatewayHandle::new(None)));
}
