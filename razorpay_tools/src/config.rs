use std::{env, time::Duration};

use gsb_common::Secret;
use log::*;

const DEFAULT_API_URL: &str = "https://api.razorpay.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Credentials and connection settings for the Razorpay API.
///
/// Credentials come from `RAZORPAY_KEY_ID` and `RAZORPAY_KEY_SECRET`. When either is missing,
/// [`RazorpayConfig::try_from_env`] returns `None` rather than failing the process: the server
/// boots without a gateway and payment endpoints report the misconfiguration per request.
#[derive(Clone, Debug)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: Secret<String>,
    /// Base URL for the gateway. Overridable with `RAZORPAY_API_URL` so tests can point the client
    /// at a local stand-in.
    pub api_url: String,
    /// Applied to every gateway request. There is no retry; a timed-out call surfaces as a gateway
    /// error and the client is expected to retry.
    pub timeout: Duration,
}

impl RazorpayConfig {
    pub fn new(key_id: &str, key_secret: Secret<String>) -> Self {
        Self {
            key_id: key_id.to_string(),
            key_secret,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn try_from_env() -> Option<Self> {
        let key_id = match env::var("RAZORPAY_KEY_ID") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => {
                warn!("🪛️ RAZORPAY_KEY_ID is not set. Payment gateway operations will be unavailable.");
                return None;
            },
        };
        let key_secret = match env::var("RAZORPAY_KEY_SECRET") {
            Ok(v) if !v.trim().is_empty() => Secret::new(v),
            _ => {
                warn!("🪛️ RAZORPAY_KEY_SECRET is not set. Payment gateway operations will be unavailable.");
                return None;
            },
        };
        let api_url = env::var("RAZORPAY_API_URL").ok().unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout = env::var("RAZORPAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid value for RAZORPAY_TIMEOUT_SECS: {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        info!("🪛️ Razorpay gateway configured for key id {key_id}");
        Some(Self { key_id, key_secret, api_url, timeout })
    }
}
