// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// What a failure of the sampler publisher does to the sampled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerFailure {
    /// Treat the failure like sampler completion: flush the latched value and
    /// keep the output open until the primary terminates.
    #[default]
    Flush,
    /// Terminate the output with the sampler's failure, discarding any latched value.
    Propagate,
}

/// Options for [`sample_with`](crate::SampleExt::sample_with).
///
/// The defaults reproduce [`sample`](crate::SampleExt::sample).
///
/// ```
/// use sampled_stream::{SampleConfig, SamplerFailure};
///
/// let config = SampleConfig::default()
///     .with_flush_on_sampler_end(false)
///     .with_sampler_failure(SamplerFailure::Propagate);
///
/// assert!(!config.flush_on_sampler_end());
/// assert_eq!(config.sampler_failure(), SamplerFailure::Propagate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleConfig {
    flush_on_sampler_end: bool,
    sampler_failure: SamplerFailure,
}

impl SampleConfig {
    /// Whether sampler termination releases the latched value one last time.
    #[must_use]
    pub const fn flush_on_sampler_end(&self) -> bool {
        self.flush_on_sampler_end
    }

    /// How sampler failures are handled.
    #[must_use]
    pub const fn sampler_failure(&self) -> SamplerFailure {
        self.sampler_failure
    }

    #[must_use]
    pub const fn with_flush_on_sampler_end(mut self, flush: bool) -> Self {
        self.flush_on_sampler_end = flush;
        self
    }

    #[must_use]
    pub const fn with_sampler_failure(mut self, policy: SamplerFailure) -> Self {
        self.sampler_failure = policy;
        self
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            flush_on_sampler_end: true,
            sampler_failure: SamplerFailure::Flush,
        }
    }
}
