//! Configuration
//! Mission: Collect deployment settings from the environment

use crate::email::SmtpConfig;
use crate::middleware::RateLimitConfig;
use anyhow::{bail, Result};
use std::env;
use std::time::Duration;

/// Runtime configuration, read once at startup.
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub rate_limit: RateLimitConfig,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Missing signing secret is a deployment error, caught before any
        // request is served.
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => bail!("JWT_SECRET not configured"),
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8088);

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "thinktrek.db".to_string());

        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&c| (4..=16).contains(&c))
            .unwrap_or(bcrypt::DEFAULT_COST);

        let max_requests = env::var("RATE_LIMIT_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(5);
        let window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(15 * 60);

        let smtp = match (env::var("EMAIL_USER"), env::var("EMAIL_PASS")) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(SmtpConfig {
                    host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                    username,
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            port,
            database_path,
            jwt_secret,
            bcrypt_cost,
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
            smtp,
        })
    }
}
