// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sampling operators for Sampled publishers.
//!
//! [`SampleExt::sample`] rate-limits a high-frequency publisher to the cadence
//! of a second, usually slower, publisher. At most one value is ever pending and
//! no value is delivered twice.

mod logging;

pub mod sample;

pub use sample::{Sample, SampleConfig, SampleExt, SamplerFailure};
