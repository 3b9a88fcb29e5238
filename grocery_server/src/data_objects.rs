use std::fmt::Display;

use grocery_engine::{
    db_types::{NewOrderLine, PaymentMethod, ShippingAddress},
    order_objects::UserProfile,
};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

//----------------------------------------------   Auth   -------------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// The login/registration response: the profile plus a fresh access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token: String,
}

//----------------------------------------------   Orders   -----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<NewOrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

//----------------------------------------------   Payments   ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub receipt: Option<String>,
}

/// The payment confirmation callback body. Field names follow the gateway's checkout handler
/// convention, which is what the storefront posts verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default, rename = "orderId")]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

impl VerifyPaymentRequest {
    /// All four identifiers are required; reports the first missing one.
    pub fn require_fields(self) -> Result<(i64, String, String, String), ServerError> {
        let order_id = self.order_id.ok_or_else(|| ServerError::MissingFields("orderId".to_string()))?;
        let payment_id = require_non_empty(self.razorpay_payment_id, "razorpay_payment_id")?;
        let gateway_order_id = require_non_empty(self.razorpay_order_id, "razorpay_order_id")?;
        let signature = require_non_empty(self.razorpay_signature, "razorpay_signature")?;
        Ok((order_id, payment_id, gateway_order_id, signature))
    }
}

fn require_non_empty(value: Option<String>, field: &str) -> Result<String, ServerError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServerError::MissingFields(field.to_string())),
    }
}
