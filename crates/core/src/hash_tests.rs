// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

// Reference values from `git hash-object --stdin`
#[yare::parameterized(
    empty = { b"",               "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391" },
    hello = { b"hello world\n",  "3b18e512dba79e4c8300dd08aeb37f8e728b8dad" },
)]
fn matches_git_hash_object(content: &[u8], expected: &str) {
    assert_eq!(git_blob_sha1(content), expected);
}

proptest! {
    #[test]
    fn hash_is_40_lowercase_hex(content in proptest::collection::vec(any::<u8>(), 0..512)) {
        let hash = git_blob_sha1(&content);
        prop_assert_eq!(hash.len(), 40);
        prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        prop_assert_eq!(git_blob_sha1(&content), hash);
    }
}
