//! Access token issuance and validation.
//!
//! Tokens are HS256 JWTs signed with the `GSB_JWT_SECRET` key and supplied by clients as
//! `Authorization: Bearer <token>`. The claims carry the account id, email and roles, so handlers
//! never re-read the user record just to authorize a request. Each request's identity travels as an
//! explicit [`JwtClaims`] value — there is no ambient "current user" state anywhere.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use grocery_engine::{db_types::{Role, User}, order_objects::OrderViewer};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The account id.
    pub sub: i64,
    pub email: String,
    pub roles: Vec<Role>,
    pub iat: usize,
    pub exp: usize,
}

impl JwtClaims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// The order-read context for this identity.
    pub fn viewer(&self) -> OrderViewer {
        OrderViewer::new(self.sub, self.is_admin())
    }
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self { encoding: EncodingKey::from_secret(secret), decoding: DecodingKey::from_secret(secret), expiry: config.token_expiry }
    }

    /// Issues a fresh access token for the account. The caller must have verified credentials
    /// before calling this.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user.id,
            email: user.email.clone(),
            roles: user.roles(),
            iat: now.timestamp() as usize,
            exp: (now + self.expiry).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    pub fn decode_claims(&self, token: &str) -> Result<JwtClaims, AuthError> {
        decode::<JwtClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::ValidationError(e.to_string()))
    }
}

/// Pulls the verified identity out of a request. The ACL middleware stores the claims in the
/// request extensions after checking roles; on routes without the middleware, the bearer token is
/// validated here directly.
pub fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    if let Some(claims) = req.extensions().get::<JwtClaims>() {
        return Ok(claims.clone());
    }
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| ServerError::InitializeError("TokenIssuer is not registered on the app".to_string()))?;
    let header = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a Bearer token".to_string()))?;
    let claims = issuer.decode_claims(token.trim())?;
    Ok(claims)
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}
