// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::subprocess::{error_text, run_with_input, MAIL_TIMEOUT};
use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Errors from mail operations
#[derive(Debug, Error)]
pub enum MailError {
    #[error("no recipients")]
    NoRecipients,
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: Option<String>,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Render with headers, as read by `sendmail -t`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(from) = &self.from {
            out.push_str(&format!("From: {}\n", from));
        }
        out.push_str(&format!("To: {}\n", self.to.join(", ")));
        // Header values must stay on one line
        out.push_str(&format!("Subject: {}\n", self.subject.replace(['\r', '\n'], " ")));
        out.push_str("Content-Type: text/plain; charset=utf-8\n\n");
        out.push_str(&self.body);
        if !self.body.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// Adapter for the mail transport
#[async_trait]
pub trait MailAdapter: Clone + Send + Sync + 'static {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Hands messages to the local `sendmail`.
#[derive(Clone, Debug)]
pub struct SendmailAdapter {
    program: String,
}

impl Default for SendmailAdapter {
    fn default() -> Self {
        Self { program: "sendmail".to_string() }
    }
}

impl SendmailAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait]
impl MailAdapter for SendmailAdapter {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        let mut cmd = Command::new(&self.program);
        cmd.arg("-t");
        let output = run_with_input(cmd, message.render().as_bytes(), MAIL_TIMEOUT, "sendmail")
            .await
            .map_err(MailError::SendFailed)?;
        if !output.status.success() {
            return Err(MailError::SendFailed(error_text(&output)));
        }
        tracing::info!(subject = %message.subject, recipients = message.to.len(), "email sent");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{EmailMessage, MailAdapter, MailError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake mail adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeMailAdapter {
        sent: Arc<Mutex<Vec<EmailMessage>>>,
    }

    impl FakeMailAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl MailAdapter for FakeMailAdapter {
        async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
            if message.to.is_empty() {
                return Err(MailError::NoRecipients);
            }
            self.sent.lock().push(message.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeMailAdapter;

#[cfg(test)]
#[path = "mail_tests.rs"]
mod tests;
