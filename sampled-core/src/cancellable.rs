// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use alloc::sync::Arc;
use core::fmt;

/// Something that can end a running subscription from the consumer side.
pub trait Cancellable: Send + Sync {
    /// Cancels the activity. Calling it more than once has no further effect.
    fn cancel(&self);
}

/// A type-erased [`Cancellable`] that cancels when dropped.
///
/// Keep the value alive for as long as the subscription should run.
///
/// ```
/// use sampled_core::{from_iter, SinkExt};
///
/// let values = from_iter::<_, ()>(vec![1, 2, 3]);
/// let cancellable = values.sink(|value| println!("{value}"), |_| {});
/// cancellable.cancel();
/// ```
#[must_use = "dropping an AnyCancellable cancels the subscription"]
pub struct AnyCancellable {
    inner: Arc<dyn Cancellable>,
}

impl AnyCancellable {
    /// Wraps a shared cancellable.
    pub fn new(inner: Arc<dyn Cancellable>) -> Self {
        Self { inner }
    }

    /// Cancels the subscription now rather than on drop.
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

impl Drop for AnyCancellable {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}

impl fmt::Debug for AnyCancellable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyCancellable")
    }
}
