//! Session gate: mints and verifies bearer tokens.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret. Nothing is
//! stored server side, so logging out cannot invalidate a token before its
//! expiry.

use crate::utils::AppError;
use actix_web::http::header::HeaderValue;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Claim names the gate owns; callers cannot override them.
const RESERVED_CLAIMS: &[&str] = &["iat", "exp", "nbf"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    /// Any other claims the caller asked to embed
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer credential on the request
    Missing,
    /// Bad signature, malformed token or elapsed expiry
    Invalid(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Missing => AppError::AuthMissing,
            AuthError::Invalid(reason) => AppError::AuthInvalid(reason),
        }
    }
}

#[derive(Clone)]
pub struct SessionGate {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionGate {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        SessionGate {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Signs `payload` (which must carry an `email`) with an expiry one hour
    /// from now.
    pub fn issue(&self, payload: Map<String, Value>) -> Result<String, AppError> {
        self.issue_at(payload, Utc::now().timestamp())
    }

    fn issue_at(&self, mut payload: Map<String, Value>, issued_at: i64) -> Result<String, AppError> {
        let email = match payload.remove("email") {
            Some(Value::String(email)) if !email.trim().is_empty() => email,
            _ => return Err(AppError::InvalidRequest("email claim is required".to_string())),
        };
        for reserved in RESERVED_CLAIMS {
            payload.remove(*reserved);
        }

        let claims = Claims {
            email,
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECONDS,
            extra: payload,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Invalid(e.to_string()))
    }

    /// Verifies the raw `Authorization` header value of a request.
    pub fn verify_header(&self, header: Option<&HeaderValue>) -> Result<Claims, AuthError> {
        let header = header.ok_or(AuthError::Missing)?;
        let token = bearer_token(header)
            .ok_or_else(|| AuthError::Invalid("malformed authorization header".to_string()))?;
        self.verify(token)
    }
}

/// Extracts `<token>` from `Bearer <token>`.
fn bearer_token(header: &HeaderValue) -> Option<&str> {
    let value = header.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
