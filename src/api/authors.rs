//! Author API Endpoints
//! Mission: Registration, verification, login, and account management

use crate::api::AppState;
use crate::auth::password::{
    generate_verification_code, hash_password, verify_password, MIN_PASSWORD_LEN,
};
use crate::models::{
    AuthorEnvelope, AuthorResponse, Claims, LoginRequest, LoginResponse, PublicAuthor,
    RegisterRequest, UpdateAuthorRequest, VerifyEmailRequest,
};
use crate::store::{AuthorChanges, NewAuthor, StoreError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use tracing::{info, warn};

/// Register a new author - POST /authors/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthorEnvelope>), ApiError> {
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password is required"));
    }
    if payload.first_name.trim().is_empty()
        || payload.last_name.trim().is_empty()
        || payload.email.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "First name, last name, and email are required",
        ));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email address"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters",
        ));
    }

    let password_hash =
        hash_password(&payload.password, state.bcrypt_cost).map_err(internal)?;
    let verification_code = generate_verification_code();

    let author = state
        .store
        .insert(NewAuthor {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password_hash,
            contact_phone: payload.contact_phone,
            address: payload.address,
            image_url: payload.image_url,
            verification_code: verification_code.clone(),
        })
        .map_err(|e| match e {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail("Email already registered"),
            other => internal(other),
        })?;

    info!(author_id = author.author_id, "Author registered");

    // Mail delivery never gates registration.
    state
        .mailer
        .dispatch_verification_code(author.email.clone(), author.full_name(), verification_code);

    Ok((
        StatusCode::CREATED,
        Json(AuthorEnvelope {
            message:
                "Author registered successfully. Please check your email for verification code."
                    .to_string(),
            author: AuthorResponse::from_author(&author),
        }),
    ))
}

/// Verify an author's email with the mailed code - POST /authors/verify
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<AuthorEnvelope>, ApiError> {
    if payload.email.is_empty() || payload.verification_code.is_empty() {
        return Err(ApiError::Validation(
            "Email and verification code are required",
        ));
    }

    let author = state
        .store
        .find_by_email(&payload.email)
        .map_err(internal)?
        .ok_or(ApiError::NotFound)?;

    if author.is_verified {
        return Err(ApiError::AlreadyVerified);
    }
    if author.verification_code.as_deref() != Some(payload.verification_code.as_str()) {
        return Err(ApiError::InvalidVerificationCode);
    }

    let verified = state.store.mark_verified(author.author_id).map_err(|e| {
        match e {
            StoreError::NotFound => ApiError::NotFound,
            other => internal(other),
        }
    })?;

    state
        .mailer
        .dispatch_welcome(verified.email.clone(), verified.full_name());

    Ok(Json(AuthorEnvelope {
        message: "Email verified successfully. You can now login.".to_string(),
        author: AuthorResponse::from_author(&verified),
    }))
}

/// Author login - POST /authors/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required"));
    }

    // Unknown email and wrong password produce the same response, so a
    // caller cannot probe which addresses are registered.
    let author = state
        .store
        .find_by_email(&payload.email)
        .map_err(internal)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !author.is_verified {
        return Err(ApiError::Unverified);
    }

    let matches =
        verify_password(&payload.password, &author.password_hash).map_err(internal)?;
    if !matches {
        warn!(author_id = author.author_id, "Failed login attempt");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt.issue(&author).map_err(internal)?;
    info!(author_id = author.author_id, "Login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        author: AuthorResponse::from_author(&author),
    }))
}

/// List authors for public display - GET /authors
pub async fn list_authors(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicAuthor>>, ApiError> {
    let authors = state.store.list_all().map_err(internal)?;
    let public: Vec<PublicAuthor> = authors.iter().map(PublicAuthor::from_author).collect();
    Ok(Json(public))
}

/// Get own profile - GET /authors/:id
pub async fn get_author(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<AuthorResponse>, ApiError> {
    ensure_owner(&claims, id)?;

    let author = state
        .store
        .find_by_id(id)
        .map_err(internal)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(AuthorResponse::from_author(&author)))
}

/// Update own profile - PUT /authors/:id
pub async fn update_author(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAuthorRequest>,
) -> Result<Json<AuthorEnvelope>, ApiError> {
    ensure_owner(&claims, id)?;

    if let Some(email) = &payload.email {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email address"));
        }
    }

    let password_hash = match &payload.password {
        Some(p) if p.len() < MIN_PASSWORD_LEN => {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters",
            ))
        }
        Some(p) => Some(hash_password(p, state.bcrypt_cost).map_err(internal)?),
        None => None,
    };

    let updated = state
        .store
        .update(
            id,
            AuthorChanges {
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
                password_hash,
                contact_phone: payload.contact_phone,
                address: payload.address,
                image_url: payload.image_url,
            },
        )
        .map_err(|e| match e {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail("Email already in use"),
            StoreError::NotFound => ApiError::NotFound,
            other => internal(other),
        })?;

    Ok(Json(AuthorEnvelope {
        message: "Profile updated successfully".to_string(),
        author: AuthorResponse::from_author(&updated),
    }))
}

/// Delete own account - DELETE /authors/:id
pub async fn delete_author(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    ensure_owner(&claims, id)?;

    let removed = state.store.delete(id).map_err(internal)?;
    if !removed {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({ "message": "Account deleted successfully" })))
}

/// The single ownership predicate: the authenticated identity may only
/// touch its own record. Fails closed.
fn ensure_owner(claims: &Claims, target_id: i64) -> Result<(), ApiError> {
    if claims.author_id != target_id {
        return Err(ApiError::AccessDenied);
    }
    Ok(())
}

/// Minimal syntactic email check: `local@domain` with a dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn internal<E: std::fmt::Display>(e: E) -> ApiError {
    warn!(error = %e, "Internal error");
    ApiError::Internal
}

/// Author API errors, translated to client responses at the boundary.
#[derive(Debug)]
pub enum ApiError {
    Validation(&'static str),
    DuplicateEmail(&'static str),
    NotFound,
    AccessDenied,
    InvalidCredentials,
    Unverified,
    InvalidVerificationCode,
    AlreadyVerified,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DuplicateEmail(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Author not found"),
            ApiError::AccessDenied => (StatusCode::FORBIDDEN, "Access denied"),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            ApiError::Unverified => (
                StatusCode::UNAUTHORIZED,
                "Please verify your email before logging in",
            ),
            ApiError::InvalidVerificationCode => {
                (StatusCode::BAD_REQUEST, "Invalid verification code")
            }
            ApiError::AlreadyVerified => (StatusCode::BAD_REQUEST, "Email already verified"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
