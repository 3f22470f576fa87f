//! Domain Models
//! Mission: Define author and authentication data structures

use serde::{Deserialize, Serialize};

/// Author account row as stored.
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub author_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>, // single-use email code - never serialize
    pub is_verified: bool,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (author_id as string)
    pub author_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub exp: usize, // expiration timestamp
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

/// Email verification request body.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    #[serde(rename = "verificationCode")]
    pub verification_code: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update request body.
///
/// Verification state (`is_verified`, `verification_code`) is deliberately
/// absent: whatever the caller supplies for those keys is dropped at
/// deserialization and can never reach the store through this path.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAuthorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

/// Author response (sanitized): no password hash, no verification code.
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub author_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub is_verified: bool,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AuthorResponse {
    pub fn from_author(author: &Author) -> Self {
        Self {
            author_id: author.author_id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            email: author.email.clone(),
            contact_phone: author.contact_phone.clone(),
            address: author.address.clone(),
            role: author.role.clone(),
            is_verified: author.is_verified,
            image_url: author.image_url.clone(),
            created_at: author.created_at.clone(),
            updated_at: author.updated_at.clone(),
        }
    }
}

/// Public listing projection: names and avatar only.
#[derive(Debug, Serialize)]
pub struct PublicAuthor {
    pub author_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
}

impl PublicAuthor {
    pub fn from_author(author: &Author) -> Self {
        Self {
            author_id: author.author_id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            image_url: author.image_url.clone(),
        }
    }
}

/// Registration / verification / update response envelope.
#[derive(Debug, Serialize)]
pub struct AuthorEnvelope {
    pub message: String,
    pub author: AuthorResponse,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub author: AuthorResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_author() -> Author {
        Author {
            author_id: 7,
            first_name: "Alice".to_string(),
            last_name: "Wangari".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            contact_phone: None,
            address: None,
            role: "author".to_string(),
            verification_code: Some("123456".to_string()),
            is_verified: false,
            image_url: Some("https://img.example/a.png".to_string()),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_author_never_serializes_secrets() {
        let json = serde_json::to_string(&sample_author()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$10$secret"));
        assert!(!json.contains("verification_code"));
        assert!(!json.contains("123456"));
    }

    #[test]
    fn test_author_response_is_sanitized() {
        let response = AuthorResponse::from_author(&sample_author());
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice@x.com"));
        assert!(!json.contains("secret"));
        assert!(!json.contains("123456"));
    }

    #[test]
    fn test_public_author_is_minimal() {
        let public = PublicAuthor::from_author(&sample_author());
        let json = serde_json::to_string(&public).unwrap();
        assert!(json.contains("Alice"));
        assert!(!json.contains("alice@x.com"));
        assert!(!json.contains("is_verified"));
        assert!(!json.contains("contact_phone"));
    }

    #[test]
    fn test_update_request_drops_verification_fields() {
        let body = r#"{"first_name":"Bob","is_verified":true,"verification_code":"000000"}"#;
        let parsed: UpdateAuthorRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.first_name.as_deref(), Some("Bob"));
        // No field exists to carry the verification state forward.
        let debug = format!("{:?}", parsed);
        assert!(!debug.contains("000000"));
    }

    #[test]
    fn test_verify_request_accepts_camel_case_code() {
        let body = r#"{"email":"a@b.com","verificationCode":"654321"}"#;
        let parsed: VerifyEmailRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.verification_code, "654321");
    }
}
