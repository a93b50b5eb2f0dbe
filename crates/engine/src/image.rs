// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-addressed container images, built at most once per platform
//! per run.

use crate::retry::with_retries;
use cim_adapters::{BuildRequest, RegistryAdapter, RegistryError};
use cim_core::{git_blob_sha1, Platform};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("platform `{0}` has no container runtime")]
    NoContainerRuntime(String),
    #[error("cannot read build definition {path}: {source}")]
    Definition { path: String, source: std::io::Error },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Directory holding one build definition per platform:
/// `<dir>/<platform>/Dockerfile`, built with `<dir>/<platform>` as context.
#[derive(Debug, Clone)]
pub struct BuildDefinitions {
    dir: PathBuf,
}

impl BuildDefinitions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn context(&self, platform: &str) -> PathBuf {
        self.dir.join(platform)
    }

    pub fn dockerfile(&self, platform: &str) -> PathBuf {
        self.context(platform).join("Dockerfile")
    }

    pub async fn read(&self, platform: &str) -> Result<Vec<u8>, ImageError> {
        read_definition(&self.dockerfile(platform)).await
    }
}

async fn read_definition(path: &Path) -> Result<Vec<u8>, ImageError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ImageError::Definition { path: path.display().to_string(), source })
}

/// Tag for an image built from `definition`: `<platform>-<git blob sha1>`.
pub fn image_tag(platform: &str, definition: &[u8]) -> String {
    format!("{}-{}", platform, git_blob_sha1(definition))
}

/// A usable image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// `<repository>:<tag>`
    pub reference: String,
    pub tag: String,
    /// Whether this run built it (as opposed to pulling it)
    pub built: bool,
}

type Slot = Arc<tokio::sync::Mutex<Option<ImageRef>>>;

/// Resolves platforms to images, building and pushing missing ones.
pub struct ImageCache<R: RegistryAdapter> {
    registry: R,
    repository: String,
    definitions: BuildDefinitions,
    /// Rebuild even when the tag already exists
    overwrite: bool,
    slots: Mutex<HashMap<String, Slot>>,
    login: OnceCell<()>,
}

impl<R: RegistryAdapter> ImageCache<R> {
    pub fn new(registry: R, repository: impl Into<String>, definitions: BuildDefinitions) -> Self {
        Self {
            registry,
            repository: repository.into(),
            definitions,
            overwrite: false,
            slots: Mutex::new(HashMap::new()),
            login: OnceCell::new(),
        }
    }

    cim_core::setters! {
        set {
            overwrite: bool,
        }
    }

    fn slot(&self, platform: &str) -> Slot {
        Arc::clone(self.slots.lock().entry(platform.to_string()).or_default())
    }

    async fn ensure_login(&self) -> Result<(), ImageError> {
        self.login
            .get_or_try_init(|| with_retries("registry login", || self.registry.login()))
            .await?;
        Ok(())
    }

    /// Image for `platform`, pulled if the registry has it, else built and
    /// pushed. Concurrent callers for one platform wait for a single build.
    pub async fn resolve_or_build(&self, platform: &Platform) -> Result<ImageRef, ImageError> {
        if !platform.has_container_runtime {
            return Err(ImageError::NoContainerRuntime(platform.name.clone()));
        }
        let slot = self.slot(&platform.name);
        let mut cached = slot.lock().await;
        if let Some(image) = cached.as_ref() {
            return Ok(image.clone());
        }

        self.ensure_login().await?;
        let definition = self.definitions.read(&platform.name).await?;
        let tag = image_tag(&platform.name, &definition);
        let reference = format!("{}:{}", self.repository, tag);

        let exists = !self.overwrite
            && with_retries("image lookup", || self.registry.exists(&reference)).await?;
        let built = if exists {
            tracing::info!(platform = %platform.name, %reference, "pulling existing image");
            with_retries("image pull", || self.registry.pull(&reference)).await?;
            false
        } else {
            let cache_ref = format!("{}:{}-cache", self.repository, platform.name);
            let request = BuildRequest {
                context: self.definitions.context(&platform.name),
                dockerfile: self.definitions.dockerfile(&platform.name),
                tags: vec![reference.clone(), cache_ref.clone()],
                cache_from: Some(cache_ref.clone()),
            };
            self.registry.build(&request).await?;
            self.registry.push(&reference).await?;
            self.registry.push(&cache_ref).await?;
            true
        };

        let image = ImageRef { reference, tag, built };
        *cached = Some(image.clone());
        Ok(image)
    }
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
