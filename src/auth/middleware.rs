//! Access Guard
//! Mission: Protect endpoints by validating bearer tokens before handlers run

use crate::auth::jwt::{JwtHandler, TokenError};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Middleware that validates the `Authorization: Bearer <token>` header and
/// attaches the decoded claims to the request for downstream handlers.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or(AuthError::MissingToken)?;

    let claims = jwt_handler.validate(&token).map_err(|e| {
        debug!(error = %e, "Token verification failed");
        AuthError::Token(e)
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Access-guard rejections.
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    Token(TokenError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (error, message) = match self {
            AuthError::MissingToken => (
                "Access token required",
                "Please login to access this resource".to_string(),
            ),
            AuthError::Token(e) => ("Authentication failed", e.to_string()),
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": error, "message": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_rejections_are_unauthorized() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let expired = AuthError::Token(TokenError::Expired).into_response();
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);

        let invalid = AuthError::Token(TokenError::Invalid).into_response();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
    }
}
