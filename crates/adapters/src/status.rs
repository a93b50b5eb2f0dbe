// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commit status adapter for the code-review system.

use async_trait::async_trait;
use cim_core::CommitState;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors from status operations
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("status request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("status api returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// One commit status to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub sha: String,
    pub state: CommitState,
    pub description: String,
    pub context: String,
    pub target_url: Option<String>,
}

/// Adapter for publishing commit statuses
#[async_trait]
pub trait StatusAdapter: Clone + Send + Sync + 'static {
    async fn set_status(&self, update: &StatusUpdate) -> Result<(), StatusError>;
}

#[derive(Serialize)]
struct StatusPayload<'a> {
    state: CommitState,
    description: &'a str,
    context: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_url: Option<&'a str>,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Publishes statuses through the GitHub commit status API.
///
/// The token is only passed to `bearer_auth` and never logged.
#[derive(Clone)]
pub struct GithubStatusAdapter {
    client: reqwest::Client,
    api_url: String,
    repo: String,
    token: Option<String>,
}

impl GithubStatusAdapter {
    /// `repo` is `owner/name`; `api_url` has no trailing slash.
    pub fn new(api_url: impl Into<String>, repo: impl Into<String>, token: Option<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            repo: repo.into(),
            token,
        }
    }

    fn url(&self, sha: &str) -> String {
        format!("{}/repos/{}/statuses/{}", self.api_url, self.repo, sha)
    }
}

#[async_trait]
impl StatusAdapter for GithubStatusAdapter {
    async fn set_status(&self, update: &StatusUpdate) -> Result<(), StatusError> {
        let payload = StatusPayload {
            state: update.state,
            description: &update.description,
            context: &update.context,
            target_url: update.target_url.as_deref(),
        };
        let mut request = self.client.post(self.url(&update.sha)).timeout(REQUEST_TIMEOUT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "cim")
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StatusError::Rejected { status: status.as_u16(), body });
        }
        tracing::info!(sha = %update.sha, state = %update.state, context = %update.context, "status published");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{StatusAdapter, StatusError, StatusUpdate};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeStatusState {
        updates: Vec<StatusUpdate>,
        reject: bool,
    }

    /// Records every status update
    #[derive(Clone, Default)]
    pub struct FakeStatusAdapter {
        inner: Arc<Mutex<FakeStatusState>>,
    }

    impl FakeStatusAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reject all further updates (they are still recorded).
        pub fn set_rejecting(&self, reject: bool) {
            self.inner.lock().reject = reject;
        }

        pub fn updates(&self) -> Vec<StatusUpdate> {
            self.inner.lock().updates.clone()
        }
    }

    #[async_trait]
    impl StatusAdapter for FakeStatusAdapter {
        async fn set_status(&self, update: &StatusUpdate) -> Result<(), StatusError> {
            let mut state = self.inner.lock();
            state.updates.push(update.clone());
            if state.reject {
                return Err(StatusError::Rejected { status: 503, body: "unavailable".to_string() });
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStatusAdapter;

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
