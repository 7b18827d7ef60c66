// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cold publisher over a fixed list of values.

use crate::logging::trace;
use crate::sampled_mutex::Mutex;
use crate::{Completion, Demand, Publisher, Subscriber, Subscription};
use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::marker::PhantomData;

/// Creates a publisher that replays `values` to every subscriber, then finishes.
///
/// Values are delivered strictly within the subscriber's demand. A subscriber
/// that requests more from inside `on_value` is served by the running emission
/// loop instead of a nested call.
///
/// ```
/// use sampled_core::{from_iter, SinkExt};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink_seen = Arc::clone(&seen);
/// let _cancellable = from_iter::<_, ()>(1..=3).sink(move |n| sink_seen.lock().unwrap().push(n), |_| {});
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// ```
pub fn from_iter<I, E>(values: I) -> Sequence<I::Item, E>
where
    I: IntoIterator,
{
    Sequence {
        values: values.into_iter().collect(),
        _failure: PhantomData,
    }
}

/// Publisher returned by [`from_iter`].
#[derive(Debug, Clone)]
pub struct Sequence<T, E> {
    values: Vec<T>,
    _failure: PhantomData<fn() -> E>,
}

impl<T, E> Sequence<T, E> {
    /// Number of values each subscriber receives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if subscribers only receive the completion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T, E> Publisher for Sequence<T, E>
where
    T: Clone + Send + 'static,
    E: 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T, E>>) {
        let subscription = Arc::new(SequenceSubscription {
            state: Mutex::new(SequenceState {
                remaining: self.values.iter().cloned().collect(),
                demand: Demand::none(),
                emitting: false,
                subscriber: Some(Arc::clone(&subscriber)),
            }),
        });

        subscriber.on_subscribe(Arc::clone(&subscription) as Arc<dyn Subscription>);
        // Empty sequences complete without waiting for demand.
        subscription.drain();
    }
}

struct SequenceState<T, E> {
    remaining: VecDeque<T>,
    demand: Demand,
    emitting: bool,
    subscriber: Option<Arc<dyn Subscriber<T, E>>>,
}

enum Step<T, E> {
    Emit(Arc<dyn Subscriber<T, E>>, T),
    Finish(Arc<dyn Subscriber<T, E>>),
}

struct SequenceSubscription<T, E> {
    state: Mutex<SequenceState<T, E>>,
}

impl<T, E> SequenceSubscription<T, E> {
    fn drain(&self) {
        {
            let mut state = self.state.lock();
            if state.emitting {
                return;
            }
            state.emitting = true;
        }

        loop {
            let step = {
                let mut state = self.state.lock();
                let Some(subscriber) = state.subscriber.clone() else {
                    state.emitting = false;
                    return;
                };

                if state.remaining.is_empty() {
                    state.subscriber = None;
                    state.emitting = false;
                    Step::Finish(subscriber)
                } else if state.demand.has_demand() {
                    match state.remaining.pop_front() {
                        Some(value) => {
                            state.demand.consume_one();
                            Step::Emit(subscriber, value)
                        }
                        None => {
                            state.emitting = false;
                            return;
                        }
                    }
                } else {
                    state.emitting = false;
                    return;
                }
            };

            match step {
                Step::Emit(subscriber, value) => {
                    let additional = subscriber.on_value(value);
                    self.state.lock().demand += additional;
                }
                Step::Finish(subscriber) => {
                    trace!("sequence: exhausted, finishing");
                    subscriber.on_complete(Completion::Finished);
                    return;
                }
            }
        }
    }
}

impl<T, E> Subscription for SequenceSubscription<T, E>
where
    T: Send,
{
    fn request(&self, demand: Demand) {
        self.state.lock().demand += demand;
        self.drain();
    }

    fn cancel(&self) {
        let released = {
            let mut state = self.state.lock();
            state.remaining.clear();
            state.subscriber.take()
        };
        drop(released);
    }
}
