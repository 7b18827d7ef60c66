// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sampled_error::{IntoSampledError, Result, ResultExt, SampledError};
use std::io;
use std::time::Duration;

#[test]
fn test_error_display() {
    let err = SampledError::upstream("sensor offline");
    assert_eq!(err.to_string(), "Upstream failure: sensor offline");

    let err = SampledError::Completed;
    assert_eq!(err.to_string(), "Publisher already completed");

    let err = SampledError::timer(Duration::ZERO, "period must be non-zero");
    assert_eq!(
        err.to_string(),
        "Timer rejected period 0ns: period must be non-zero"
    );
}

#[test]
fn test_error_constructors() {
    let err = SampledError::upstream("boom");
    assert!(matches!(err, SampledError::UpstreamFailure { .. }));

    let err = SampledError::invalid_state("not subscribed");
    assert!(matches!(err, SampledError::InvalidState { .. }));

    let err = SampledError::invalid_configuration("empty");
    assert!(matches!(err, SampledError::InvalidConfiguration { .. }));

    let err = SampledError::user_error(io::Error::other("disk"));
    assert!(matches!(err, SampledError::UserError(_)));
}

#[test]
fn test_is_recoverable() {
    assert!(SampledError::upstream("test").is_recoverable());
    assert!(!SampledError::Completed.is_recoverable());
    assert!(!SampledError::user_error(io::Error::other("test")).is_recoverable());
}

#[test]
fn test_is_permanent() {
    assert!(SampledError::Completed.is_permanent());
    assert!(SampledError::invalid_state("test").is_permanent());
    assert!(SampledError::timer(Duration::ZERO, "zero").is_permanent());
    assert!(!SampledError::upstream("test").is_permanent());
}

#[test]
fn test_error_is_cloneable_for_broadcast() {
    let err = SampledError::user_error(io::Error::other("shared"));
    let copy = err.clone();

    assert_eq!(err.to_string(), copy.to_string());
}

#[test]
fn test_result_context_wraps_user_errors() {
    let result: Result<()> = Err(SampledError::user_error(io::Error::other("test error")));

    let err = result.context("operation failed").unwrap_err();
    assert!(matches!(err, SampledError::UpstreamFailure { .. }));
    assert!(err.to_string().contains("operation failed"));
    assert!(err.to_string().contains("test error"));
}

#[test]
fn test_result_context_preserves_other_errors() {
    let result: Result<()> = Err(SampledError::Completed);

    let err = result.context("ignored").unwrap_err();
    assert!(matches!(err, SampledError::Completed));
}

#[test]
fn test_with_context_is_lazy() {
    let ok: Result<u8> = Ok(1);
    let value = ok
        .with_context(|| panic!("context must not be built for Ok"))
        .unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_into_sampled_error() {
    let err = io::Error::other("raw").into_sampled();
    assert!(matches!(err, SampledError::UserError(_)));

    let err = io::Error::other("raw").into_sampled_error("reading");
    assert_eq!(err.to_string(), "Upstream failure: reading: raw");
}
