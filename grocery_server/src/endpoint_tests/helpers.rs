use actix_web::{
    body::MessageBody,
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{Duration, TimeZone, Utc};
use grocery_engine::db_types::{Order, OrderLine, OrderStatus, PaymentMethod, Role, ShippingAddress, User};
use gsb_common::{Rupees, Secret};
use serde::Serialize;

use crate::{auth::TokenIssuer, config::AuthConfig};

// A test `AuthConfig` for issuing tokens. DO NOT re-use this key anywhere.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Secret::new("endpoint-test-signing-key".to_string()),
        token_expiry: Duration::days(1),
    }
}

pub fn issue_token(user: &User) -> String {
    TokenIssuer::new(&test_auth_config()).issue_token(user).expect("Failed to sign token")
}

pub fn customer(id: i64) -> User {
    User {
        id,
        name: "Priya".to_string(),
        email: "priya@example.com".to_string(),
        password_hash: "$2b$04$placeholderplaceholderplaceholder".to_string(),
        role: Role::User,
        created_at: Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
    }
}

pub fn admin(id: i64) -> User {
    User { name: "Asha".to_string(), email: "asha@example.com".to_string(), role: Role::Admin, ..customer(id) }
}

/// A canned two-unit order of product #7 at a locked price of ₹10.00.
pub fn sample_order(id: i64, user_id: i64) -> Order {
    let created = Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap();
    Order {
        id,
        user_id,
        lines: vec![OrderLine {
            id: 1,
            order_id: id,
            product_id: 7,
            title: "Basmati rice 1kg".to_string(),
            quantity: 3,
            unit_price: Rupees::from_rupees(10),
        }],
        total: Rupees::from_rupees(30),
        shipping_address: ShippingAddress {
            address: "14 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            postal_code: "560001".to_string(),
            phone: "+91 98450 00000".to_string(),
        },
        payment_method: PaymentMethod::Cod,
        status: OrderStatus::Pending,
        is_paid: false,
        paid_at: None,
        payment_result: None,
        shipped_at: None,
        delivered_at: None,
        created_at: created,
        updated_at: created,
    }
}

pub async fn get_request(
    auth_header: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    send(TestRequest::get().uri(path), auth_header, configure).await
}

pub async fn post_request<T: Serialize>(
    auth_header: &str,
    path: &str,
    body: &T,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    send(TestRequest::post().uri(path).set_json(body), auth_header, configure).await
}

pub async fn put_request<T: Serialize>(
    auth_header: &str,
    path: &str,
    body: &T,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    send(TestRequest::put().uri(path).set_json(body), auth_header, configure).await
}

async fn send(
    mut req: TestRequest,
    auth_header: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    if !auth_header.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {auth_header}")));
    }
    let req = req.to_request();
    let issuer = TokenIssuer::new(&test_auth_config());
    let app = App::new().app_data(web::Data::new(issuer)).configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
