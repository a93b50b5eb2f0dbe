// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container registry adapter: login, tag queries, pull, build, push.

use crate::subprocess::{
    error_text, run_with_input, run_with_timeout, IMAGE_BUILD_TIMEOUT, REGISTRY_TIMEOUT,
};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

/// Errors from registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry login failed: {0}")]
    Login(String),
    #[error("registry query for {reference} failed: {message}")]
    Query { reference: String, message: String },
    #[error("pull of {reference} failed: {message}")]
    Pull { reference: String, message: String },
    #[error("image build for {tag} failed: {message}")]
    Build { tag: String, message: String },
    #[error("push of {reference} failed: {message}")]
    Push { reference: String, message: String },
}

/// An image build with inline layer cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Build context directory
    pub context: PathBuf,
    pub dockerfile: PathBuf,
    /// Full references to tag the result with; the first is the primary tag
    pub tags: Vec<String>,
    /// Reference to pull cached layers from, if any
    pub cache_from: Option<String>,
}

impl BuildRequest {
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or_default()
    }
}

/// Adapter for a container image registry.
#[async_trait]
pub trait RegistryAdapter: Clone + Send + Sync + 'static {
    /// Authenticate against the registry.
    async fn login(&self) -> Result<(), RegistryError>;

    /// Whether the registry already holds `reference`.
    async fn exists(&self, reference: &str) -> Result<bool, RegistryError>;

    async fn pull(&self, reference: &str) -> Result<(), RegistryError>;

    async fn build(&self, request: &BuildRequest) -> Result<(), RegistryError>;

    async fn push(&self, reference: &str) -> Result<(), RegistryError>;
}

/// Registry credentials. The password is only ever written to stdin.
#[derive(Clone)]
pub struct RegistryCredentials {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("server", &self.server)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Registry adapter driving the `docker` CLI.
#[derive(Clone, Debug)]
pub struct DockerRegistryAdapter {
    docker: String,
    credentials: Option<RegistryCredentials>,
}

impl Default for DockerRegistryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerRegistryAdapter {
    pub fn new() -> Self {
        Self { docker: "docker".to_string(), credentials: None }
    }

    pub fn docker(mut self, program: impl Into<String>) -> Self {
        self.docker = program.into();
        self
    }

    pub fn credentials(mut self, credentials: Option<RegistryCredentials>) -> Self {
        self.credentials = credentials;
        self
    }

    fn command(&self) -> Command {
        Command::new(&self.docker)
    }
}

/// Messages docker prints when a manifest does not exist, as opposed to the
/// registry being unreachable.
const MISSING_MANIFEST_MARKERS: &[&str] = &["no such manifest", "manifest unknown", "manifest not found"];

#[async_trait]
impl RegistryAdapter for DockerRegistryAdapter {
    async fn login(&self) -> Result<(), RegistryError> {
        let Some(creds) = &self.credentials else {
            tracing::debug!("no registry credentials configured, skipping login");
            return Ok(());
        };
        let mut cmd = self.command();
        cmd.args(["login", "--username", &creds.username, "--password-stdin", &creds.server]);
        let output = run_with_input(cmd, creds.password.as_bytes(), REGISTRY_TIMEOUT, "docker login")
            .await
            .map_err(RegistryError::Login)?;
        if !output.status.success() {
            return Err(RegistryError::Login(error_text(&output)));
        }
        tracing::info!(server = %creds.server, "logged in to registry");
        Ok(())
    }

    async fn exists(&self, reference: &str) -> Result<bool, RegistryError> {
        let mut cmd = self.command();
        cmd.args(["manifest", "inspect", reference]);
        let output = run_with_timeout(cmd, REGISTRY_TIMEOUT, "docker manifest inspect")
            .await
            .map_err(|message| RegistryError::Query { reference: reference.to_string(), message })?;
        if output.status.success() {
            return Ok(true);
        }
        let message = error_text(&output);
        let lower = message.to_lowercase();
        if MISSING_MANIFEST_MARKERS.iter().any(|m| lower.contains(m)) {
            Ok(false)
        } else {
            Err(RegistryError::Query { reference: reference.to_string(), message })
        }
    }

    async fn pull(&self, reference: &str) -> Result<(), RegistryError> {
        let mut cmd = self.command();
        cmd.args(["pull", reference]);
        let pull_err = |message| RegistryError::Pull { reference: reference.to_string(), message };
        let output = run_with_timeout(cmd, REGISTRY_TIMEOUT, "docker pull").await.map_err(pull_err)?;
        if !output.status.success() {
            return Err(pull_err(error_text(&output)));
        }
        Ok(())
    }

    async fn build(&self, request: &BuildRequest) -> Result<(), RegistryError> {
        let tag = request.primary_tag().to_string();
        let mut cmd = self.command();
        cmd.arg("build")
            .arg("--build-arg")
            .arg("BUILDKIT_INLINE_CACHE=1")
            .arg("-f")
            .arg(&request.dockerfile);
        if let Some(cache) = &request.cache_from {
            cmd.arg("--cache-from").arg(cache);
        }
        for t in &request.tags {
            cmd.arg("-t").arg(t);
        }
        cmd.arg(&request.context).env("DOCKER_BUILDKIT", "1");
        tracing::info!(%tag, cache_from = ?request.cache_from, "building image");
        let output = run_with_timeout(cmd, IMAGE_BUILD_TIMEOUT, "docker build")
            .await
            .map_err(|message| RegistryError::Build { tag: tag.clone(), message })?;
        if !output.status.success() {
            return Err(RegistryError::Build { tag, message: error_text(&output) });
        }
        Ok(())
    }

    async fn push(&self, reference: &str) -> Result<(), RegistryError> {
        let mut cmd = self.command();
        cmd.args(["push", reference]);
        let push_err = |message| RegistryError::Push { reference: reference.to_string(), message };
        let output = run_with_timeout(cmd, REGISTRY_TIMEOUT, "docker push").await.map_err(push_err)?;
        if !output.status.success() {
            return Err(push_err(error_text(&output)));
        }
        tracing::info!(%reference, "pushed image");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BuildRequest, RegistryAdapter, RegistryError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    /// Registry operations, in call order
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RegistryCall {
        Login,
        Exists(String),
        Pull(String),
        Build(BuildRequest),
        Push(String),
    }

    #[derive(Default)]
    struct FakeRegistryState {
        calls: Vec<RegistryCall>,
        images: HashSet<String>,
        /// Remaining injected failures per operation name
        failures: HashMap<&'static str, u32>,
    }

    impl FakeRegistryState {
        fn take_failure(&mut self, op: &'static str) -> bool {
            match self.failures.get_mut(op) {
                Some(n) if *n > 0 => {
                    *n -= 1;
                    true
                }
                _ => false,
            }
        }
    }

    /// In-memory registry. Builds make their tags exist; pushes of unknown
    /// references fail.
    #[derive(Clone, Default)]
    pub struct FakeRegistryAdapter {
        inner: Arc<Mutex<FakeRegistryState>>,
    }

    impl FakeRegistryAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pretend `reference` is already in the registry.
        pub fn add_image(&self, reference: &str) {
            self.inner.lock().images.insert(reference.to_string());
        }

        /// Make the next `times` calls of `op` (`login`, `exists`, `pull`,
        /// `build`, `push`) fail.
        pub fn fail(&self, op: &'static str, times: u32) {
            self.inner.lock().failures.insert(op, times);
        }

        pub fn calls(&self) -> Vec<RegistryCall> {
            self.inner.lock().calls.clone()
        }

        pub fn builds(&self) -> Vec<BuildRequest> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    RegistryCall::Build(b) => Some(b),
                    _ => None,
                })
                .collect()
        }

        pub fn pushes(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    RegistryCall::Push(r) => Some(r),
                    _ => None,
                })
                .collect()
        }

        pub fn count(&self, op: fn(&RegistryCall) -> bool) -> usize {
            self.inner.lock().calls.iter().filter(|c| op(c)).count()
        }
    }

    #[async_trait]
    impl RegistryAdapter for FakeRegistryAdapter {
        async fn login(&self) -> Result<(), RegistryError> {
            let mut state = self.inner.lock();
            state.calls.push(RegistryCall::Login);
            if state.take_failure("login") {
                return Err(RegistryError::Login("injected failure".to_string()));
            }
            Ok(())
        }

        async fn exists(&self, reference: &str) -> Result<bool, RegistryError> {
            let mut state = self.inner.lock();
            state.calls.push(RegistryCall::Exists(reference.to_string()));
            if state.take_failure("exists") {
                return Err(RegistryError::Query {
                    reference: reference.to_string(),
                    message: "injected failure".to_string(),
                });
            }
            Ok(state.images.contains(reference))
        }

        async fn pull(&self, reference: &str) -> Result<(), RegistryError> {
            let mut state = self.inner.lock();
            state.calls.push(RegistryCall::Pull(reference.to_string()));
            if state.take_failure("pull") || !state.images.contains(reference) {
                return Err(RegistryError::Pull {
                    reference: reference.to_string(),
                    message: "manifest unknown".to_string(),
                });
            }
            Ok(())
        }

        async fn build(&self, request: &BuildRequest) -> Result<(), RegistryError> {
            let mut state = self.inner.lock();
            state.calls.push(RegistryCall::Build(request.clone()));
            if state.take_failure("build") {
                return Err(RegistryError::Build {
                    tag: request.primary_tag().to_string(),
                    message: "injected failure".to_string(),
                });
            }
            state.images.extend(request.tags.iter().cloned());
            Ok(())
        }

        async fn push(&self, reference: &str) -> Result<(), RegistryError> {
            let mut state = self.inner.lock();
            state.calls.push(RegistryCall::Push(reference.to_string()));
            if state.take_failure("push") || !state.images.contains(reference) {
                return Err(RegistryError::Push {
                    reference: reference.to_string(),
                    message: "no such image".to_string(),
                });
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRegistryAdapter, RegistryCall};

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
