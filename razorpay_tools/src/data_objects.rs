use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::RazorpayApiError;

/// The payload for creating an order on the gateway. Razorpay only accepts integral amounts in
/// minor currency units (paise), so construction goes through [`NewGatewayOrder::try_new`], which
/// rounds the submitted amount to the nearest paisa and rejects non-positive amounts.
#[derive(Debug, Clone, Serialize)]
pub struct NewGatewayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

impl NewGatewayOrder {
    pub fn try_new(amount: f64, currency: &str, receipt: Option<String>) -> Result<Self, RazorpayApiError> {
        let amount = round_minor_units(amount)?;
        let receipt = receipt.unwrap_or_else(|| format!("receipt_{}", Utc::now().timestamp_millis()));
        Ok(Self { amount, currency: currency.to_string(), receipt })
    }
}

/// Rounds an amount expressed in (possibly fractional) minor currency units to the nearest whole
/// unit. Amounts that are not positive after rounding are rejected.
pub fn round_minor_units(amount: f64) -> Result<i64, RazorpayApiError> {
    if !amount.is_finite() {
        return Err(RazorpayApiError::InvalidAmount(format!("{amount} is not a finite amount")));
    }
    let rounded = amount.round();
    if rounded < 1.0 {
        return Err(RazorpayApiError::InvalidAmount(format!("{amount} is not a positive amount")));
    }
    if rounded > i64::MAX as f64 {
        return Err(RazorpayApiError::InvalidAmount(format!("{amount} is too large")));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(rounded as i64)
}

/// An order as the gateway reports it. The `id` is the value the storefront checkout widget needs,
/// and the one that later appears in the payment callback as `razorpay_order_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
