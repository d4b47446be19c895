//! Verification-code delivery boundary.
//!
//! Real delivery (an email provider API) is external to this system; the
//! gateway only needs something that accepts (email, code). `LogMailer` is
//! the development channel and doubles as the hook point for tests.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), MailError>;
}

/// Development-only delivery: the code lands in the log instead of an inbox.
/// Never wire this up in a deployment with real users.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), MailError> {
        tracing::info!(%email, %code, "dev mailer: verification code");
        Ok(())
    }
}
