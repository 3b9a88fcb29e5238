use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RazorpayApiError {
    #[error("The payment gateway is not configured. Set RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET.")]
    NotConfigured,
    #[error("Invalid payment amount. {0}")]
    InvalidAmount(String),
    #[error("Could not initialize the gateway client. {0}")]
    Initialization(String),
    #[error("Payment gateway error: {0}")]
    ResponseError(String),
    #[error("The gateway returned an error response ({status}): {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not deserialize the gateway response. {0}")]
    JsonError(String),
    #[error("Payment verification failed: invalid signature")]
    SignatureMismatch,
}
