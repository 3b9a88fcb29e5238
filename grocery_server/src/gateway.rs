use log::*;
use razorpay_tools::{RazorpayApi, RazorpayApiError, RazorpayConfig};

use crate::errors::ServerError;

/// The server's handle on the payment gateway. Built once at startup from the (possibly absent)
/// gateway configuration and shared across requests. When credentials were missing at boot, the
/// handle is empty and every gateway operation reports the misconfiguration instead of crashing
/// the process.
#[derive(Clone)]
pub struct GatewayHandle {
    api: Option<RazorpayApi>,
}

impl GatewayHandle {
    pub fn new(config: Option<RazorpayConfig>) -> Self {
        let api = config.and_then(|config| match RazorpayApi::new(config) {
            Ok(api) => Some(api),
            Err(e) => {
                error!("🪛️ Could not initialize the payment gateway client. {e}");
                None
            },
        });
        Self { api }
    }

    pub fn from_api(api: RazorpayApi) -> Self {
        Self { api: Some(api) }
    }

    pub fn is_configured(&self) -> bool {
        self.api.is_some()
    }

    pub fn api(&self) -> Result<&RazorpayApi, ServerError> {
        self.api.as_ref().ok_or(ServerError::GatewayError(RazorpayApiError::NotConfigured))
    }
}
