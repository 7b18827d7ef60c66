// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Completion, Demand, Subscription};
use alloc::sync::Arc;

/// A consumer of values from a [`Publisher`](crate::Publisher).
///
/// A publisher calls `on_subscribe` exactly once, before anything else. It then
/// calls `on_value` at most as many times as the subscriber has requested and
/// finally `on_complete` at most once. Calls for one subscription are never
/// issued concurrently, although a subscriber may be shared between threads.
pub trait Subscriber<T, E>: Send + Sync {
    /// Receives the handle used to request values and to cancel.
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

    /// Receives one value and returns the *additional* demand it wants.
    ///
    /// Returning [`Demand::none()`] keeps the outstanding demand as it was,
    /// minus the value just delivered.
    fn on_value(&self, value: T) -> Demand;

    /// Receives the terminal signal.
    fn on_complete(&self, completion: Completion<E>);
}
