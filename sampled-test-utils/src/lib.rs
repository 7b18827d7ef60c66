// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the Sampled reactive streaming library.
//!
//! This crate provides a recording subscriber, subject constructors and async
//! assertion helpers. It is designed for use in development and testing only,
//! not for production code.
//!
//! # Key Types
//!
//! - [`RecordingSubscriber`] records every [`TestEvent`] and lets a test pick the
//!   initial demand, the demand returned per value, and an optional re-entrancy hook.
//! - [`test_subject`] builds a [`PassthroughSubject`] failing with [`SampledError`].
//! - [`helpers`] holds the timing-based assertions used with timers and threads.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod recording_subscriber;

use sampled_core::PassthroughSubject;
use sampled_error::SampledError;

pub use helpers::{assert_nothing_emitted, wait_until};
pub use recording_subscriber::{RecordingSubscriber, TestEvent};

/// Creates a subject carrying `T` values that fails with [`SampledError`].
#[must_use]
pub fn test_subject<T: Clone + 'static>() -> PassthroughSubject<T, SampledError> {
    PassthroughSubject::new()
}

/// Creates a `(primary, sampler)` pair of subjects for sampling tests.
#[must_use]
pub fn test_subjects<T: Clone + 'static>(
) -> (PassthroughSubject<T, SampledError>, PassthroughSubject<(), SampledError>) {
    (PassthroughSubject::new(), PassthroughSubject::new())
}
