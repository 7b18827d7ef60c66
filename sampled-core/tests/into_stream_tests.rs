// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use sampled_core::{from_iter, IntoStreamExt, SampledError};
use sampled_test_utils::test_subject;

#[tokio::test]
async fn test_into_stream_yields_values_then_ends() {
    // Arrange
    let stream = from_iter::<_, SampledError>(vec![1, 2, 3]).into_stream();

    // Act
    let items: Vec<_> = stream.collect().await;

    // Assert
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(Result::is_ok));
}

#[tokio::test]
async fn test_into_stream_yields_failure_as_err() -> anyhow::Result<()> {
    // Arrange
    let subject = test_subject::<i32>();
    let mut stream = subject.into_stream();

    // Act
    subject.send(1)?;
    subject.fail(SampledError::invalid_state("broken"))?;

    // Assert
    assert_eq!(stream.next().await.transpose()?, Some(1));
    assert!(matches!(
        stream.next().await,
        Some(Err(SampledError::InvalidState { .. }))
    ));
    assert!(stream.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_into_stream_drop_cancels_subscription() -> anyhow::Result<()> {
    // Arrange
    let subject = test_subject::<i32>();
    let stream = subject.into_stream();
    assert_eq!(subject.subscriber_count(), 1);

    // Act
    drop(stream);
    subject.send(1)?;

    // Assert
    assert_eq!(subject.subscriber_count(), 0);
    Ok(())
}
