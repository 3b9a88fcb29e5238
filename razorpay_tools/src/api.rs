use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::RazorpayConfig,
    data_objects::{GatewayOrder, NewGatewayOrder},
    helpers::verify_payment_signature,
    RazorpayApiError,
};

/// A configured Razorpay client. Construct one at process start and share it across requests; it
/// wraps a [`reqwest::Client`] with basic auth and an explicit request timeout already applied.
#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        let url = self.url(path);
        trace!("Sending gateway query: {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Gateway query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| RazorpayApiError::ResponseError(e.to_string()))?;
            Err(RazorpayApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1{path}", self.config.api_url)
    }

    /// Creates an order on the gateway. The returned [`GatewayOrder`] carries the id the checkout
    /// widget needs to collect the payment. There is no retry here; a gateway failure is reported
    /// to the caller, who decides whether to try again.
    pub async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, RazorpayApiError> {
        debug!("Creating gateway order for {} {}", order.amount, order.currency);
        let result = self.rest_query::<GatewayOrder, NewGatewayOrder>(Method::POST, "/orders", Some(order)).await?;
        info!("Created gateway order {}", result.id);
        Ok(result)
    }

    /// Verifies the payment signature from a checkout callback against this client's key secret.
    pub fn verify_payment_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), RazorpayApiError> {
        let secret = self.config.key_secret.reveal();
        if verify_payment_signature(gateway_order_id, payment_id, signature, secret) {
            Ok(())
        } else {
            warn!("🔐️ Payment signature mismatch for gateway order {gateway_order_id}");
            Err(RazorpayApiError::SignatureMismatch)
        }
    }
}
