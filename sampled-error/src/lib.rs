// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the Sampled reactive streaming library
//!
//! This crate provides the error type carried by the reference publishers and
//! the failure-aware parts of the Sampled operators. It defines a root
//! [`SampledError`] type with specific variants for different failure modes,
//! allowing library users to handle errors appropriately.
//!
//! # Examples
//!
//! ```
//! use sampled_error::{SampledError, Result};
//!
//! fn read_sensor() -> Result<f64> {
//!     Err(SampledError::upstream("sensor offline"))
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

/// Root error type for all Sampled operations
///
/// The type is `Clone` so that a single failure can be broadcast to every
/// subscriber of a hot publisher as a terminal signal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SampledError {
    /// A publisher failed while producing values
    ///
    /// This is the failure forwarded downstream when an upstream source
    /// terminates abnormally.
    #[error("Upstream failure: {context}")]
    UpstreamFailure {
        /// Description of what went wrong upstream
        context: String,
    },

    /// The publisher has already sent its terminal signal
    ///
    /// Returned by hot publishers when a value or completion is sent after
    /// completion.
    #[error("Publisher already completed")]
    Completed,

    /// Invalid state encountered
    ///
    /// This indicates that an operation was attempted when the publisher or
    /// subscription was in an inappropriate state.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state
        message: String,
    },

    /// A publisher was configured with an unusable parameter
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the rejected parameter
        message: String,
    },

    /// A timed source could not be driven at the requested period
    #[error("Timer rejected period {period:?}: {reason}")]
    Timer {
        /// The requested period
        period: Duration,
        /// Why the period was rejected
        reason: String,
    },

    /// Custom error from user code
    ///
    /// This wraps errors produced by user-provided functions and callbacks,
    /// allowing them to be propagated as a terminal failure.
    #[error("User error: {0}")]
    UserError(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl SampledError {
    /// Create an upstream failure with the given context
    pub fn upstream(context: impl Into<String>) -> Self {
        Self::UpstreamFailure {
            context: context.into(),
        }
    }

    /// Create an invalid state error with the given message
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error with the given message
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a timer error for the given period
    pub fn timer(period: Duration, reason: impl Into<String>) -> Self {
        Self::Timer {
            period,
            reason: reason.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    /// Check if this is a recoverable error
    ///
    /// Upstream failures may succeed on a fresh subscription.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UpstreamFailure { .. })
    }

    /// Check if this error indicates a permanent failure
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::InvalidState { .. }
                | Self::InvalidConfiguration { .. }
                | Self::Timer { .. }
        )
    }
}

impl From<std::convert::Infallible> for SampledError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Specialized Result type for Sampled operations
///
/// # Examples
///
/// ```
/// use sampled_error::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SampledError>;

/// Extension trait for converting errors into `SampledError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`.
pub trait IntoSampledError {
    /// Convert this error into a `SampledError` with additional context
    fn into_sampled_error(self, context: &str) -> SampledError;

    /// Convert this error into a `SampledError` without additional context
    fn into_sampled(self) -> SampledError
    where
        Self: Sized,
    {
        self.into_sampled_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoSampledError for E {
    fn into_sampled_error(self, context: &str) -> SampledError {
        if context.is_empty() {
            SampledError::user_error(self)
        } else {
            SampledError::upstream(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(SampledError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(SampledError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SampledError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap_user_error(e.into(), context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap_user_error(e.into(), f()))
    }
}

fn wrap_user_error(error: SampledError, context: String) -> SampledError {
    match error {
        SampledError::UserError(inner) => SampledError::UpstreamFailure {
            context: format!("{context}: {inner}"),
        },
        other => other,
    }
}
