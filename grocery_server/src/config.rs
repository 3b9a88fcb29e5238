use std::env;

use chrono::Duration;
use gsb_common::Secret;
use log::*;
use rand::RngCore;
use razorpay_tools::RazorpayConfig;

use crate::errors::ServerError;

const DEFAULT_GSB_HOST: &str = "127.0.0.1";
const DEFAULT_GSB_PORT: u16 = 8360;
const DEFAULT_TOKEN_EXPIRY_DAYS: i64 = 7;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// `None` when the gateway credentials are absent. The server still runs; payment endpoints
    /// degrade to a per-request configuration error.
    pub razorpay: Option<RazorpayConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GSB_HOST.to_string(),
            port: DEFAULT_GSB_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            razorpay: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("GSB_HOST").ok().unwrap_or_else(|| DEFAULT_GSB_HOST.into());
        let port = env::var("GSB_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for GSB_PORT. {e} Using the default, {DEFAULT_GSB_PORT}, instead."
                    );
                    DEFAULT_GSB_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_GSB_PORT);
        let database_url = env::var("GSB_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ GSB_DATABASE_URL is not set. Please set it to the URL for the store database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let razorpay = RazorpayConfig::try_from_env();
        Self { host, port, database_url, auth, razorpay }
    }
}

//-------------------------------------------------  AuthConfig  ------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 key used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    /// How long issued tokens stay valid. Tokens do not refresh.
    pub token_expiry: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this, since every session invalidates all previously issued tokens. Set \
             GSB_JWT_SECRET instead. 🚨️🚨️🚨️"
        );
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let secret = bytes.iter().fold(String::with_capacity(64), |mut s, b| {
            use std::fmt::Write;
            let _ = write!(s, "{b:02x}");
            s
        });
        Self { jwt_secret: Secret::new(secret), token_expiry: Duration::days(DEFAULT_TOKEN_EXPIRY_DAYS) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("GSB_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [GSB_JWT_SECRET]")))?;
        if secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("GSB_JWT_SECRET is empty".to_string()));
        }
        let token_expiry = env::var("GSB_JWT_EXPIRY_DAYS")
            .map_err(|_| {
                info!(
                    "🪛️ GSB_JWT_EXPIRY_DAYS is not set. Using the default value of {DEFAULT_TOKEN_EXPIRY_DAYS} days."
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::days)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for GSB_JWT_EXPIRY_DAYS. {e}"))
            })
            .ok()
            .unwrap_or_else(|| Duration::days(DEFAULT_TOKEN_EXPIRY_DAYS));
        Ok(Self { jwt_secret: Secret::new(secret), token_expiry })
    }
}
