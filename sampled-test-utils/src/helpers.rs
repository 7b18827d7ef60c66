// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Polls `condition` until it holds or `timeout_ms` elapses.
///
/// Returns whether the condition was met. Used by tests driven by timers or
/// other threads, where delivery is not synchronous with the test body.
pub async fn wait_until<F>(condition: F, timeout_ms: u64) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(5)).await;
    }
}

/// Waits `timeout_ms` and asserts that `count` did not change meanwhile.
///
/// # Panics
///
/// Panics if the count changed, i.e. something was emitted unexpectedly.
pub async fn assert_nothing_emitted<F>(count: F, timeout_ms: u64)
where
    F: Fn() -> usize,
{
    let before = count();
    sleep(Duration::from_millis(timeout_ms)).await;
    let after = count();
    assert_eq!(
        before, after,
        "Unexpected emission, expected no output within {timeout_ms}ms"
    );
}
