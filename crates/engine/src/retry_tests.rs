// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};

async fn flaky(calls: &AtomicU32, failures: u32) -> Result<u32, String> {
    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
    if n <= failures {
        Err(format!("failure {}", n))
    } else {
        Ok(n)
    }
}

#[yare::parameterized(
    first_try      = { 0, Ok(1),                          1 },
    second_try     = { 1, Ok(2),                          2 },
    third_try      = { 2, Ok(3),                          3 },
    exhausted      = { 3, Err("failure 3".to_string()),   3 },
    never_works    = { 10, Err("failure 3".to_string()),  3 },
)]
fn attempts(failures: u32, expected: Result<u32, String>, calls_made: u32) {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let calls = AtomicU32::new(0);
    let result = rt.block_on(with_retries("op", || flaky(&calls, failures)));
    assert_eq!(result, expected);
    assert_eq!(calls.load(Ordering::SeqCst), calls_made);
}
