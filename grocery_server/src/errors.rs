use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use grocery_engine::traits::{AuthApiError, CatalogApiError, OrderApiError};
use razorpay_tools::RazorpayApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Missing required payment information: {0}")]
    MissingFields(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("{0}")]
    OrderError(#[from] OrderApiError),
    #[error("{0}")]
    CatalogError(#[from] CatalogApiError),
    #[error("{0}")]
    AccountError(#[from] AuthApiError),
    #[error("{0}")]
    GatewayError(#[from] RazorpayApiError),
    #[error("Could not render the document. {0}")]
    DocumentError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingFields(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::BAD_REQUEST,
                AuthError::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::OrderError(e) => match e {
                OrderApiError::EmptyOrder => StatusCode::BAD_REQUEST,
                OrderApiError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
                OrderApiError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
                OrderApiError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                OrderApiError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                OrderApiError::NotAuthorized => StatusCode::FORBIDDEN,
                OrderApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CatalogError(e) => match e {
                CatalogApiError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CatalogApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
                CatalogApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::AccountError(e) => match e {
                AuthApiError::EmailTaken => StatusCode::BAD_REQUEST,
                AuthApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthApiError::UserNotFound => StatusCode::NOT_FOUND,
                AuthApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthApiError::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::GatewayError(e) => match e {
                RazorpayApiError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
                RazorpayApiError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                RazorpayApiError::SignatureMismatch => StatusCode::BAD_REQUEST,
                RazorpayApiError::Initialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RazorpayApiError::ResponseError(_) => StatusCode::BAD_GATEWAY,
                RazorpayApiError::QueryError { .. } => StatusCode::BAD_GATEWAY,
                RazorpayApiError::JsonError(_) => StatusCode::BAD_GATEWAY,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DocumentError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Every failure renders as a JSON body with a human-readable message; no stack traces
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "message": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Not authorized, no token provided.")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Could not create an access token. {0}")]
    TokenCreation(String),
}
