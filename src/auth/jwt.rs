//! JWT Token Handler
//! Mission: Generate and validate session tokens securely

use crate::models::{Author, Claims};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Token validation failures, distinguished for user-facing messages.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
    Malformed,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Expired => write!(f, "Session expired, please login again"),
            TokenError::Invalid => write!(f, "Invalid token, please login again"),
            TokenError::Malformed => write!(f, "Malformed token, please login again"),
        }
    }
}

impl std::error::Error for TokenError {}

/// JWT handler for token operations.
pub struct JwtHandler {
    secret: String,
    expiration_days: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with the signing secret.
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expiration_days: 7, // 7-day sessions
        }
    }

    /// Issue a token for an authenticated author.
    pub fn issue(&self, author: &Author) -> Result<String> {
        self.issue_at(author, Utc::now())
    }

    /// Issue a token with the expiry computed from an explicit instant.
    pub fn issue_at(&self, author: &Author, now: DateTime<Utc>) -> Result<String> {
        let expiration = now
            .checked_add_signed(chrono::Duration::days(self.expiration_days))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: author.author_id.to_string(),
            author_id: author.author_id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            email: author.email.clone(),
            exp: expiration,
        };

        debug!(
            author_id = author.author_id,
            expires_days = self.expiration_days,
            "Issuing session token"
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Validate a token and extract its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed,
            _ => TokenError::Invalid,
        })?;

        debug!(author_id = decoded.claims.author_id, "Validated session token");
        Ok(decoded.claims)
    }
}
