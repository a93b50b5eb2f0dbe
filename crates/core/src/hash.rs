// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content hashing for cache keys.

use sha1::{Digest, Sha1};

/// Git blob SHA-1 of `content`, as printed by `git hash-object`.
///
/// Git format: `blob <size>\0<content>`
pub fn git_blob_sha1(content: &[u8]) -> String {
    let header = format!("blob {}\0", content.len());
    let mut hasher = Sha1::new();
    hasher.update(header.as_bytes());
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
