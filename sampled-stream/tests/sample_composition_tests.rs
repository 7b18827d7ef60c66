// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `sample` operator combined with other publishers and adapters.

use futures::StreamExt;
use parking_lot::Mutex;
use sampled_core::{from_iter, Completion, IntoStreamExt, Publisher, SinkExt};
use sampled_error::SampledError;
use sampled_stream::SampleExt;
use sampled_test_utils::{test_subject, test_subjects, RecordingSubscriber};
use std::sync::Arc;

#[tokio::test]
async fn test_sample_into_stream_yields_sampled_values() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let mut stream = primary.clone().sample(sampler.clone()).into_stream();

    // Act
    primary.send(1)?;
    primary.send(2)?;
    sampler.send(())?;
    primary.send(3)?;
    sampler.send(())?;
    primary.finish()?;

    // Assert
    assert_eq!(stream.next().await.transpose()?, Some(2));
    assert_eq!(stream.next().await.transpose()?, Some(3));
    assert!(stream.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_sample_into_stream_surfaces_primary_failure() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let mut stream = primary.clone().sample(sampler.clone()).into_stream();

    // Act
    primary.send(1)?;
    sampler.send(())?;
    primary.fail(SampledError::upstream("sensor offline"))?;

    // Assert
    assert_eq!(stream.next().await.transpose()?, Some(1));
    assert!(matches!(
        stream.next().await,
        Some(Err(SampledError::UpstreamFailure { .. }))
    ));
    assert!(stream.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_sample_dropping_stream_cancels_upstreams() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let stream = primary.clone().sample(sampler.clone()).into_stream();

    // Act
    drop(stream);

    // Assert
    assert_eq!(primary.subscriber_count(), 0);
    assert_eq!(sampler.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_sample_finite_sampler_with_empty_latch_emits_nothing() {
    // Arrange
    let primary = test_subject::<&'static str>();
    let sampler = from_iter::<_, SampledError>(vec![(), ()]);
    let recorder = RecordingSubscriber::<&'static str, SampledError>::unlimited();

    // Act
    primary.clone().sample(sampler).subscribe(recorder.clone());

    // Assert
    assert_eq!(recorder.value_count(), 0);
    assert!(recorder.completion().is_none());
}

#[test]
fn test_sample_finite_sequence_as_primary_completes() {
    // Arrange
    let primary = from_iter::<_, SampledError>(vec![1, 2, 3]);
    let sampler = test_subject::<()>();
    let recorder = RecordingSubscriber::<i32, SampledError>::unlimited();

    // Act
    primary.sample(sampler.clone()).subscribe(recorder.clone());

    // Assert
    assert_eq!(recorder.value_count(), 0);
    assert!(matches!(recorder.completion(), Some(Completion::Finished)));
    assert_eq!(sampler.subscriber_count(), 0);
}

#[test]
fn test_sample_chained_samplers() -> anyhow::Result<()> {
    // Arrange
    let (primary, fast) = test_subjects::<i32>();
    let slow = test_subject::<()>();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    let _cancellable = primary
        .clone()
        .sample(fast.clone())
        .sample(slow.clone())
        .sink_values(move |value| sink_seen.lock().push(value));

    // Act
    primary.send(1)?;
    fast.send(())?;
    primary.send(2)?;
    fast.send(())?;
    slow.send(())?;
    slow.send(())?;

    // Assert
    assert_eq!(*seen.lock(), vec![2]);
    Ok(())
}

#[test]
fn test_sample_sink_cancellable_detaches_on_drop() -> anyhow::Result<()> {
    // Arrange
    let (primary, sampler) = test_subjects::<i32>();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    let cancellable = primary
        .clone()
        .sample(sampler.clone())
        .sink_values(move |value| sink_seen.lock().push(value));

    // Act
    primary.send(1)?;
    sampler.send(())?;
    drop(cancellable);
    primary.send(2)?;
    sampler.send(())?;

    // Assert
    assert_eq!(*seen.lock(), vec![1]);
    assert_eq!(primary.subscriber_count(), 0);
    assert_eq!(sampler.subscriber_count(), 0);
    Ok(())
}
