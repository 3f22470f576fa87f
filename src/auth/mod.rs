//! Authentication Module
//! Mission: Secure author access with bcrypt credentials and JWT sessions

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{JwtHandler, TokenError};
pub use middleware::auth_middleware;
