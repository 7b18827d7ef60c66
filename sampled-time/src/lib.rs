// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Time-based publishers for Sampled.
//!
//! [`Timer`] emits the current [`Instant`](std::time::Instant) at a fixed
//! period, which makes it the usual sampler for
//! [`sample`](https://docs.rs/sampled-stream): read a fast source at a steady cadence.
//!
//! Requires the `runtime-tokio` feature (enabled by default); every timer
//! subscription runs as a task on the tokio runtime.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[cfg(feature = "runtime-tokio")]
mod logging;

#[cfg(feature = "runtime-tokio")]
pub mod timer;

#[cfg(feature = "runtime-tokio")]
pub use timer::Timer;

#[cfg(feature = "runtime-tokio")]
pub use tokio::time::MissedTickBehavior;
