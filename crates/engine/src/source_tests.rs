// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn checkout_clones_then_checks_out_revision() {
    let source = SourceSpec::new("https://example.org/lib.git", "abc123");
    let rendered: Vec<String> = source.checkout_commands().iter().map(|c| c.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "git clone --quiet --no-checkout https://example.org/lib.git src",
            "git checkout --quiet --force abc123",
            "git submodule update --quiet --init --recursive",
        ]
    );
    assert!(source.checkout_commands()[1..].iter().all(|c| c.cwd.as_deref() == Some(SOURCE_DIR)));
}

#[test]
fn in_source_prefixes_checkout_dir() {
    assert_eq!(in_source("CMakeLists.txt"), "src/CMakeLists.txt");
}
