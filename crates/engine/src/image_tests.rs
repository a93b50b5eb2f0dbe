// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cim_adapters::{FakeRegistryAdapter, RegistryCall};
use cim_core::OsFamily;

const DOCKERFILE: &[u8] = b"FROM ubuntu:22.04\nRUN apt-get update\n";

fn container(name: &str) -> Platform {
    Platform::new(name, OsFamily::LinuxContainer, "container-host").has_container_runtime(true)
}

fn definitions(platforms: &[&str]) -> (tempfile::TempDir, BuildDefinitions) {
    let dir = tempfile::tempdir().unwrap();
    for p in platforms {
        std::fs::create_dir_all(dir.path().join(p)).unwrap();
        std::fs::write(dir.path().join(p).join("Dockerfile"), DOCKERFILE).unwrap();
    }
    let defs = BuildDefinitions::new(dir.path());
    (dir, defs)
}

#[test]
fn tag_is_platform_and_blob_hash() {
    let tag = image_tag("ubuntu-22.04", b"hello world\n");
    assert_eq!(tag, "ubuntu-22.04-3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
}

#[tokio::test]
async fn builds_and_pushes_missing_image_once() {
    let (_dir, defs) = definitions(&["ubuntu-22.04"]);
    let registry = FakeRegistryAdapter::new();
    let cache = ImageCache::new(registry.clone(), "repo", defs);
    let platform = container("ubuntu-22.04");

    let first = cache.resolve_or_build(&platform).await.unwrap();
    let second = cache.resolve_or_build(&platform).await.unwrap();

    assert_eq!(first, second);
    assert!(first.built);
    assert_eq!(first.reference, format!("repo:{}", image_tag("ubuntu-22.04", DOCKERFILE)));
    let builds = registry.builds();
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0].cache_from.as_deref(), Some("repo:ubuntu-22.04-cache"));
    assert_eq!(registry.pushes(), vec![first.reference.clone(), "repo:ubuntu-22.04-cache".to_string()]);
    assert_eq!(registry.count(|c| matches!(c, RegistryCall::Exists(_))), 1);
    assert_eq!(registry.count(|c| matches!(c, RegistryCall::Login)), 1);
}

#[tokio::test]
async fn existing_image_is_pulled_not_built() {
    let (_dir, defs) = definitions(&["ubuntu-22.04"]);
    let registry = FakeRegistryAdapter::new();
    let reference = format!("repo:{}", image_tag("ubuntu-22.04", DOCKERFILE));
    registry.add_image(&reference);
    let cache = ImageCache::new(registry.clone(), "repo", defs);

    let image = cache.resolve_or_build(&container("ubuntu-22.04")).await.unwrap();
    assert!(!image.built);
    assert!(registry.builds().is_empty());
    assert_eq!(registry.count(|c| matches!(c, RegistryCall::Pull(_))), 1);
}

#[tokio::test]
async fn overwrite_rebuilds_existing_tag() {
    let (_dir, defs) = definitions(&["ubuntu-22.04"]);
    let registry = FakeRegistryAdapter::new();
    registry.add_image(&format!("repo:{}", image_tag("ubuntu-22.04", DOCKERFILE)));
    let cache = ImageCache::new(registry.clone(), "repo", defs).overwrite(true);

    assert!(cache.resolve_or_build(&container("ubuntu-22.04")).await.unwrap().built);
    assert_eq!(registry.count(|c| matches!(c, RegistryCall::Exists(_))), 0);
}

#[tokio::test]
async fn concurrent_callers_share_one_build() {
    let (_dir, defs) = definitions(&["ubuntu-20.04", "ubuntu-22.04"]);
    let registry = FakeRegistryAdapter::new();
    let cache = Arc::new(ImageCache::new(registry.clone(), "repo", defs));

    let mut set = tokio::task::JoinSet::new();
    for i in 0..8 {
        let cache = Arc::clone(&cache);
        let name = if i % 2 == 0 { "ubuntu-20.04" } else { "ubuntu-22.04" };
        set.spawn(async move { cache.resolve_or_build(&container(name)).await });
    }
    while let Some(result) = set.join_next().await {
        result.unwrap().unwrap();
    }
    assert_eq!(registry.builds().len(), 2);
}

#[tokio::test]
async fn transient_pull_failures_are_retried() {
    let (_dir, defs) = definitions(&["ubuntu-22.04"]);
    let registry = FakeRegistryAdapter::new();
    registry.add_image(&format!("repo:{}", image_tag("ubuntu-22.04", DOCKERFILE)));
    registry.fail("pull", 2);
    registry.fail("login", 2);
    let cache = ImageCache::new(registry.clone(), "repo", defs);

    cache.resolve_or_build(&container("ubuntu-22.04")).await.unwrap();
    assert_eq!(registry.count(|c| matches!(c, RegistryCall::Pull(_))), 3);
    assert_eq!(registry.count(|c| matches!(c, RegistryCall::Login)), 3);
}

#[tokio::test]
async fn third_pull_failure_is_fatal() {
    let (_dir, defs) = definitions(&["ubuntu-22.04"]);
    let registry = FakeRegistryAdapter::new();
    registry.add_image(&format!("repo:{}", image_tag("ubuntu-22.04", DOCKERFILE)));
    registry.fail("pull", 3);
    let cache = ImageCache::new(registry.clone(), "repo", defs);

    let err = cache.resolve_or_build(&container("ubuntu-22.04")).await.unwrap_err();
    assert!(matches!(err, ImageError::Registry(RegistryError::Pull { .. })));
}

#[tokio::test]
async fn hosts_without_containers_are_rejected() {
    let (_dir, defs) = definitions(&[]);
    let cache = ImageCache::new(FakeRegistryAdapter::new(), "repo", defs);
    let freebsd = Platform::new("freebsd", OsFamily::FreeBsd, "freebsd");
    assert!(matches!(
        cache.resolve_or_build(&freebsd).await,
        Err(ImageError::NoContainerRuntime(name)) if name == "freebsd"
    ));
}

#[tokio::test]
async fn missing_definition_is_reported() {
    let (_dir, defs) = definitions(&[]);
    let cache = ImageCache::new(FakeRegistryAdapter::new(), "repo", defs);
    let err = cache.resolve_or_build(&container("ubuntu-22.04")).await.unwrap_err();
    assert!(matches!(err, ImageError::Definition { .. }));
}
