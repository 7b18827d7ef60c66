// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error propagation tests for the `sample` operator.

use sampled_core::{Completion, PassthroughSubject, Publisher};
use sampled_error::SampledError;
use sampled_stream::{SampleConfig, SampleExt, SamplerFailure};
use sampled_test_utils::{test_subjects, RecordingSubscriber, TestEvent};

#[test]
fn test_sample_propagates_primary_failure_once() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let recorder = RecordingSubscriber::<i32, SampledError>::unlimited();
    primary.clone().sample(sampler.clone()).subscribe(recorder.clone());

    // Act
    primary.send(1)?;
    primary.fail(SampledError::upstream("sensor offline"))?;
    sampler.send(())?;
    sampler.finish()?;

    // Assert
    assert_eq!(recorder.value_count(), 0);
    assert_eq!(recorder.completion_count(), 1);
    match recorder.completion() {
        Some(Completion::Failed(SampledError::UpstreamFailure { context })) => {
            assert_eq!(context, "sensor offline");
        }
        other => panic!("Expected upstream failure, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_sample_sampler_failure_is_swallowed_by_default() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let recorder = RecordingSubscriber::<i32, SampledError>::unlimited();
    primary.clone().sample(sampler.clone()).subscribe(recorder.clone());

    // Act
    primary.send(7)?;
    sampler.fail(SampledError::upstream("clock lost"))?;

    // Assert
    assert_eq!(recorder.values(), vec![7]);
    assert!(
        recorder.completion().is_none(),
        "Sampler failure must not end the output by default"
    );

    // Act
    primary.finish()?;

    // Assert
    assert!(matches!(recorder.completion(), Some(Completion::Finished)));
    Ok(())
}

#[test]
fn test_sample_sampler_failure_propagates_when_configured() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let recorder = RecordingSubscriber::<i32, SampledError>::unlimited();
    let config = SampleConfig::default().with_sampler_failure(SamplerFailure::Propagate);
    primary
        .clone()
        .sample_with(sampler.clone(), config)
        .subscribe(recorder.clone());

    // Act
    primary.send(7)?;
    sampler.fail(SampledError::invalid_state("clock lost"))?;
    primary.send(8)?;

    // Assert
    assert!(matches!(
        recorder.events().as_slice(),
        [
            TestEvent::Subscribed,
            TestEvent::Completed(Completion::Failed(SampledError::InvalidState { .. })),
        ]
    ));
    assert_eq!(primary.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_sample_propagated_sampler_failure_is_converted() -> anyhow::Result<()> {
    // Arrange
    let primary = PassthroughSubject::<i32, SampledError>::new();
    let sampler = PassthroughSubject::<(), std::convert::Infallible>::new();
    let recorder = RecordingSubscriber::<i32, SampledError>::unlimited();
    let config = SampleConfig::default().with_sampler_failure(SamplerFailure::Propagate);
    primary
        .clone()
        .sample_with(sampler.clone(), config)
        .subscribe(recorder.clone());

    // Act
    primary.send(1)?;
    sampler.send(())?;
    sampler.finish()?;

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert!(recorder.completion().is_none());
    Ok(())
}

#[test]
fn test_sample_without_flush_on_sampler_end() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let recorder = RecordingSubscriber::<i32, SampledError>::unlimited();
    let config = SampleConfig::default().with_flush_on_sampler_end(false);
    primary
        .clone()
        .sample_with(sampler.clone(), config)
        .subscribe(recorder.clone());

    // Act
    primary.send(3)?;
    sampler.finish()?;

    // Assert
    assert_eq!(recorder.value_count(), 0);
    assert!(recorder.completion().is_none());

    // Act
    primary.finish()?;

    // Assert
    assert!(matches!(recorder.completion(), Some(Completion::Finished)));
    Ok(())
}

#[test]
fn test_sample_primary_failure_after_sampler_failure() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let recorder = RecordingSubscriber::<i32, SampledError>::unlimited();
    primary.clone().sample(sampler.clone()).subscribe(recorder.clone());

    // Act
    sampler.fail(SampledError::upstream("clock lost"))?;
    primary.send(1)?;
    primary.fail(SampledError::upstream("sensor offline"))?;

    // Assert
    assert_eq!(recorder.value_count(), 0);
    assert_eq!(recorder.completion_count(), 1);
    assert!(matches!(
        recorder.completion(),
        Some(Completion::Failed(SampledError::UpstreamFailure { .. }))
    ));
    Ok(())
}
