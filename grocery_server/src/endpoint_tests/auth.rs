use actix_web::{http::StatusCode, web, web::ServiceConfig};
use grocery_engine::{db_types::Role, traits::AuthApiError, AuthApi};
use serde_json::{json, Value};

use super::{
    helpers::{customer, get_request, issue_token, post_request},
    mocks::MockUserManager,
};
use crate::routes::{LoginRoute, ProfileRoute, RegisterRoute};

#[actix_web::test]
async fn profile_without_a_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/api/auth/profile", configure_profile).await.expect_err("Expected error");
    assert!(err.contains("no token"), "Got: {err}");
}

#[actix_web::test]
async fn profile_with_a_tampered_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut token = issue_token(&customer(1));
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    let err = get_request(&token, "/api/auth/profile", configure_profile).await.expect_err("Expected error");
    assert!(err.contains("Access token is invalid"), "Got: {err}");
}

#[actix_web::test]
async fn profile_returns_the_callers_account() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&customer(1));
    let (status, body) = get_request(&token, "/api/auth/profile", configure_profile).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let profile: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(profile["id"], 1);
    assert_eq!(profile["email"], "priya@example.com");
    assert_eq!(profile["role"], "user");
    assert!(profile.get("passwordHash").is_none() && profile.get("password_hash").is_none());
}

#[actix_web::test]
async fn registration_returns_a_profile_and_token() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "name": "Priya", "email": "priya@example.com", "password": "correct horse" });
    let (status, body) =
        post_request("", "/api/auth/register", &body, configure_register).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["email"], "priya@example.com");
    assert_eq!(response["role"], "user");
    assert!(response["token"].as_str().map(|t| !t.is_empty()).unwrap_or(false));
}

#[actix_web::test]
async fn login_round_trips_with_the_stored_hash() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "email": "priya@example.com", "password": "secret123" });
    let (status, body) = post_request("", "/api/auth/login", &body, configure_login).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["id"], 1);
    assert!(response["token"].as_str().map(|t| !t.is_empty()).unwrap_or(false));
}

#[actix_web::test]
async fn login_with_a_wrong_password_yields_401() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "email": "priya@example.com", "password": "not the password" });
    let (status, body) = post_request("", "/api/auth/login", &body, configure_login).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid credentials"), "Got: {body}");
}

#[actix_web::test]
async fn login_for_an_unknown_email_yields_the_same_401() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "email": "nobody@example.com", "password": "secret123" });
    let (status, body) = post_request("", "/api/auth/login", &body, configure_unknown_login).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid credentials"), "Got: {body}");
}

#[actix_web::test]
async fn duplicate_registration_yields_400() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "name": "Impostor", "email": "priya@example.com", "password": "hunter2" });
    let (status, body) =
        post_request("", "/api/auth/register", &body, configure_register_taken).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("User already exists"), "Got: {body}");
}

fn configure_profile(cfg: &mut ServiceConfig) {
    let mut users = MockUserManager::new();
    users.expect_fetch_user().returning(|id| Ok(Some(customer(id))));
    cfg.service(ProfileRoute::<MockUserManager>::new()).app_data(web::Data::new(AuthApi::new(users)));
}

fn configure_register(cfg: &mut ServiceConfig) {
    let mut users = MockUserManager::new();
    users.expect_create_user().returning(|new_user| {
        let mut user = customer(1);
        user.name = new_user.name;
        user.email = new_user.email;
        user.password_hash = new_user.password_hash;
        user.role = Role::User;
        Ok(user)
    });
    cfg.service(RegisterRoute::<MockUserManager>::new()).app_data(web::Data::new(AuthApi::new(users)));
}

fn configure_register_taken(cfg: &mut ServiceConfig) {
    let mut users = MockUserManager::new();
    users.expect_create_user().returning(|_| Err(AuthApiError::EmailTaken));
    cfg.service(RegisterRoute::<MockUserManager>::new()).app_data(web::Data::new(AuthApi::new(users)));
}

fn configure_login(cfg: &mut ServiceConfig) {
    let mut users = MockUserManager::new();
    users.expect_fetch_user_by_email().returning(|_| {
        let mut user = customer(1);
        user.password_hash = bcrypt::hash("secret123", 4).unwrap();
        Ok(Some(user))
    });
    cfg.service(LoginRoute::<MockUserManager>::new()).app_data(web::Data::new(AuthApi::new(users)));
}

fn configure_unknown_login(cfg: &mut ServiceConfig) {
    let mut users = MockUserManager::new();
    users.expect_fetch_user_by_email().returning(|_| Ok(None));
    cfg.service(LoginRoute::<MockUserManager>::new()).app_data(web::Data::new(AuthApi::new(users)));
}
