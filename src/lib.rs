//! Thinktrek Backend Library
//!
//! Identity and access control for the publishing platform: registration
//! with email-verification gating, bcrypt credentials, JWT sessions,
//! ownership-checked account management, and rate-limited auth endpoints.

pub mod api;
pub mod auth;
pub mod config;
pub mod email;
pub mod middleware;
pub mod models;
pub mod store;
