//! Email Service
//! Mission: Deliver verification codes and welcome mail over SMTP

use anyhow::{Context, Result};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::{debug, info, warn};

/// SMTP relay settings. Absent entirely when mail is not configured.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
}

/// Outbound mail sender.
///
/// Every send is fire-and-forget: the `dispatch_*` methods hand the work to
/// a blocking task and return immediately, and a failed send is logged and
/// swallowed. Registration and verification never block on, or fail
/// because of, mail transport.
#[derive(Clone)]
pub struct Mailer {
    smtp: Option<SmtpConfig>,
}

impl Mailer {
    pub fn new(smtp: Option<SmtpConfig>) -> Self {
        if smtp.is_none() {
            warn!("SMTP credentials not configured; outbound email disabled");
        }
        Self { smtp }
    }

    /// Queue the verification-code email. Returns before the send happens.
    pub fn dispatch_verification_code(&self, to: String, name: String, code: String) {
        let mailer = self.clone();
        tokio::task::spawn_blocking(move || {
            match mailer.send_verification_code(&to, &name, &code) {
                Ok(()) => info!(recipient = %to, "Verification email sent"),
                Err(e) => warn!(recipient = %to, error = %e, "Verification email send failed"),
            }
        });
    }

    /// Queue the post-verification welcome email.
    pub fn dispatch_welcome(&self, to: String, name: String) {
        let mailer = self.clone();
        tokio::task::spawn_blocking(move || match mailer.send_welcome(&to, &name) {
            Ok(()) => info!(recipient = %to, "Welcome email sent"),
            Err(e) => warn!(recipient = %to, error = %e, "Welcome email send failed"),
        });
    }

    fn send_verification_code(&self, to: &str, name: &str, code: &str) -> Result<()> {
        let body = format!(
            "Hello {name}!\n\
            \n\
            Thank you for registering with Thinktrek. Your verification code is:\n\
            \n\
            {code}\n\
            \n\
            Please enter this code on the verification page to activate your account.\n\
            If you didn't create an account, please ignore this email.\n\
            \n\
            Best regards,\n\
            The Thinktrek Team"
        );
        self.send(to, "Verify Your Email - Thinktrek", &body)
    }

    fn send_welcome(&self, to: &str, name: &str) -> Result<()> {
        let body = format!(
            "Welcome {name}!\n\
            \n\
            Thank you for joining Thinktrek! Your email has been verified and you\n\
            can now log in and start publishing.\n\
            \n\
            Best regards,\n\
            The Thinktrek Team"
        );
        self.send(to, "Welcome to Thinktrek!", &body)
    }

    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let Some(creds) = &self.smtp else {
            // Mirror of running without EMAIL_USER/EMAIL_PASS: skip quietly.
            debug!(recipient = %to, subject, "SMTP disabled, skipping send");
            return Ok(());
        };

        let email = Message::builder()
            .from(
                format!("Thinktrek <{}>", creds.username)
                    .parse()
                    .context("Invalid from address")?,
            )
            .to(to.parse().context("Invalid to address")?)
            .subject(subject)
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build email")?;

        let transport = SmtpTransport::relay(&creds.host)
            .context("Failed to create SMTP transport")?
            .credentials(Credentials::new(
                creds.username.clone(),
                creds.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(10)))
            .build();

        transport.send(&email).context("Failed to send email")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_mailer_send_is_noop_ok() {
        let mailer = Mailer::new(None);
        assert!(mailer
            .send_verification_code("alice@x.com", "Alice", "123456")
            .is_ok());
        assert!(mailer.send_welcome("alice@x.com", "Alice").is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_never_blocks_or_panics() {
        let mailer = Mailer::new(None);
        mailer.dispatch_verification_code(
            "alice@x.com".to_string(),
            "Alice".to_string(),
            "123456".to_string(),
        );
        mailer.dispatch_welcome("alice@x.com".to_string(), "Alice".to_string());
        // Give the spawned tasks a beat; nothing to assert beyond no panic.
        tokio::task::yield_now().await;
    }
}
