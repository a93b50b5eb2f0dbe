// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn seed_then_assign_first_writer_wins() {
    let mut info = BranchInfo::new();
    info.seed_components(["compA", "compB"]);
    assert_eq!(info.unassigned(), vec!["compA", "compB"]);

    let first = info.assign_available("P1", ["compA"]);
    assert_eq!(first, vec!["compA"]);

    let second = info.assign_available("P2", ["compA", "compB"]);
    assert_eq!(second, vec!["compB"]);

    assert_eq!(info.platform_of("compA"), Some("P1"));
    assert_eq!(info.platform_of("compB"), Some("P2"));
    assert!(info.unassigned().is_empty());
}

#[test]
fn assign_ignores_unknown_components() {
    let mut info = BranchInfo::new();
    info.seed_components(["known"]);
    let assigned = info.assign_available("P1", ["stranger", "known"]);
    assert_eq!(assigned, vec!["known"]);
    assert!(!info.has_component("stranger"));
}

#[test]
fn reseeding_keeps_existing_assignment() {
    let mut info = BranchInfo::new();
    info.seed_components(["a"]);
    info.assign_available("P1", ["a"]);
    info.seed_components(["a", "b"]);
    assert_eq!(info.platform_of("a"), Some("P1"));
    assert_eq!(info.unassigned(), vec!["b"]);
}

#[test]
fn force_assign_overrides_only_known_components() {
    let mut info = BranchInfo::new();
    info.seed_components(["build_armcc"]);
    info.assign_available("ubuntu-16.04", ["build_armcc"]);
    assert!(info.force_assign("build_armcc", "arm-compilers"));
    assert_eq!(info.platform_of("build_armcc"), Some("arm-compilers"));
    assert!(!info.force_assign("missing", "arm-compilers"));
}

#[test]
fn assignments_preserve_discovery_order() {
    let info = BranchInfo::from_assignments([("z", "P1"), ("a", "P2")]);
    let pairs: Vec<_> = info.assignments().collect();
    assert_eq!(pairs, vec![("z", "P1"), ("a", "P2")]);
}

#[test]
fn serializes_unassigned_as_null() {
    let mut info = BranchInfo::new();
    info.seed_components(["compA"]);
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["component_platform_map"]["compA"], serde_json::Value::Null);
    assert!(json.get("requirements_override").is_none());
}
