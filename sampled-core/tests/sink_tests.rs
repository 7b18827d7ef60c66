// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use sampled_core::{from_iter, Completion, SampledError, SinkExt};
use sampled_test_utils::test_subject;
use std::sync::Arc;

#[test]
fn test_sink_receives_values_and_completion() {
    // Arrange
    let values = Arc::new(Mutex::new(Vec::new()));
    let completions = Arc::new(Mutex::new(Vec::new()));
    let sink_values = Arc::clone(&values);
    let sink_completions = Arc::clone(&completions);

    // Act
    let _cancellable = from_iter::<_, ()>(vec![1, 2, 3]).sink(
        move |value| sink_values.lock().push(value),
        move |completion| sink_completions.lock().push(completion),
    );

    // Assert
    assert_eq!(*values.lock(), vec![1, 2, 3]);
    assert_eq!(*completions.lock(), vec![Completion::Finished]);
}

#[test]
fn test_sink_cancel_stops_delivery() -> anyhow::Result<()> {
    // Arrange
    let subject = test_subject::<i32>();
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink_values = Arc::clone(&values);
    let cancellable = subject.sink_values(move |value| sink_values.lock().push(value));

    // Act
    subject.send(1)?;
    cancellable.cancel();
    subject.send(2)?;

    // Assert
    assert_eq!(*values.lock(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_sink_drop_cancels() -> anyhow::Result<()> {
    // Arrange
    let subject = test_subject::<i32>();
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink_values = Arc::clone(&values);

    // Act
    {
        let _cancellable = subject.sink_values(move |value| sink_values.lock().push(value));
        subject.send(1)?;
    }
    subject.send(2)?;

    // Assert
    assert_eq!(*values.lock(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_sink_receives_failure_once() -> anyhow::Result<()> {
    // Arrange
    let subject = test_subject::<i32>();
    let failures = Arc::new(Mutex::new(0usize));
    let sink_failures = Arc::clone(&failures);
    let _cancellable = subject.sink(
        |_| {},
        move |completion: Completion<SampledError>| {
            if completion.is_failure() {
                *sink_failures.lock() += 1;
            }
        },
    );

    // Act
    subject.fail(SampledError::upstream("boom"))?;

    // Assert
    assert_eq!(*failures.lock(), 1);
    Ok(())
}
