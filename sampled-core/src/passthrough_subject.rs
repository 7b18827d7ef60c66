// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject.
//!
//! A [`PassthroughSubject`] pushes each value it is given to every current
//! subscriber that has outstanding demand.
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers do not receive past values, only values sent after subscribing.
//! - **No buffering**: A subscriber without demand when a value is sent misses that value.
//! - **Thread-safe**: Cheap to clone; all clones share the same internal state.
//! - **Serialized**: Concurrent `send` calls are delivered one at a time; a subscriber may
//!   re-enter `send` from inside its own callback.
//! - **Terminal**: `finish` / `fail` reach every subscriber once; late subscribers receive
//!   the stored completion immediately.
//!
//! ## Example
//!
//! ```
//! use sampled_core::{PassthroughSubject, SinkExt};
//! use std::sync::{Arc, Mutex};
//!
//! let subject = PassthroughSubject::<i32, ()>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink_seen = Arc::clone(&seen);
//! let _cancellable = subject.sink(move |value| sink_seen.lock().unwrap().push(value), |_| {});
//!
//! subject.send(1).unwrap();
//! subject.send(2).unwrap();
//! subject.finish().unwrap();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! ```

use crate::logging::trace;
use crate::sampled_mutex::{Mutex, ReentrantMutex};
use crate::{Completion, Demand, EmptySubscription, Publisher, Subscriber, Subscription};
use alloc::sync::Arc;
use alloc::vec::Vec;
use sampled_error::{Result, SampledError};

struct SubjectState<T, E> {
    completion: Option<Completion<E>>,
    subscriptions: Vec<Arc<SubjectSubscription<T, E>>>,
}

struct SubscriptionState<T, E> {
    subscriber: Option<Arc<dyn Subscriber<T, E>>>,
    demand: Demand,
}

// One subscriber's view of the subject.
struct SubjectSubscription<T, E> {
    state: Mutex<SubscriptionState<T, E>>,
}

impl<T, E> SubjectSubscription<T, E> {
    fn new(subscriber: Arc<dyn Subscriber<T, E>>) -> Self {
        Self {
            state: Mutex::new(SubscriptionState {
                subscriber: Some(subscriber),
                demand: Demand::none(),
            }),
        }
    }

    fn is_active(&self) -> bool {
        self.state.lock().subscriber.is_some()
    }

    fn deliver(&self, value: T) {
        let subscriber = {
            let mut state = self.state.lock();
            if !state.demand.has_demand() {
                trace!("passthrough subject: subscriber has no demand, value dropped");
                return;
            }
            let Some(subscriber) = state.subscriber.clone() else {
                return;
            };
            state.demand.consume_one();
            subscriber
        };

        let additional = subscriber.on_value(value);
        self.state.lock().demand += additional;
    }

    fn terminate(&self, completion: Completion<E>) {
        let subscriber = self.state.lock().subscriber.take();
        if let Some(subscriber) = subscriber {
            subscriber.on_complete(completion);
        }
    }
}

impl<T, E> Subscription for SubjectSubscription<T, E>
where
    T: 'static,
    E: 'static,
{
    fn request(&self, demand: Demand) {
        self.state.lock().demand += demand;
    }

    fn cancel(&self) {
        // Dropped outside the lock: the subscriber may own this subscription.
        let subscriber = self.state.lock().subscriber.take();
        drop(subscriber);
    }
}

/// A hot subject that forwards values to all current subscribers with demand.
///
/// `PassthroughSubject` is the usual way to push values imperatively into a
/// Sampled pipeline, both in tests and at the edge of an application.
///
/// See the [module documentation](self) for examples and more details.
pub struct PassthroughSubject<T, E> {
    state: Arc<Mutex<SubjectState<T, E>>>,
    emission: Arc<ReentrantMutex<()>>,
}

impl<T, E> PassthroughSubject<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a new subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                completion: None,
                subscriptions: Vec::new(),
            })),
            emission: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Sends a value to every subscriber with outstanding demand.
    ///
    /// # Errors
    ///
    /// Returns `SampledError::Completed` if the subject has already completed.
    pub fn send(&self, value: T) -> Result<()> {
        let _emission = self.emission.lock();

        let targets = {
            let mut state = self.state.lock();
            if state.completion.is_some() {
                return Err(SampledError::Completed);
            }
            state.subscriptions.retain(|subscription| subscription.is_active());
            state.subscriptions.clone()
        };

        for subscription in targets {
            subscription.deliver(value.clone());
        }
        Ok(())
    }

    /// Sends the terminal signal to every subscriber and remembers it for late ones.
    ///
    /// # Errors
    ///
    /// Returns `SampledError::Completed` if the subject has already completed.
    pub fn send_completion(&self, completion: Completion<E>) -> Result<()> {
        let _emission = self.emission.lock();

        let targets = {
            let mut state = self.state.lock();
            if state.completion.is_some() {
                return Err(SampledError::Completed);
            }
            state.completion = Some(completion.clone());
            core::mem::take(&mut state.subscriptions)
        };

        for subscription in targets {
            subscription.terminate(completion.clone());
        }
        Ok(())
    }

    /// Completes the subject normally.
    ///
    /// # Errors
    ///
    /// Returns `SampledError::Completed` if the subject has already completed.
    pub fn finish(&self) -> Result<()> {
        self.send_completion(Completion::Finished)
    }

    /// Terminates the subject with `error`.
    ///
    /// # Errors
    ///
    /// Returns `SampledError::Completed` if the subject has already completed.
    pub fn fail(&self, error: E) -> Result<()> {
        self.send_completion(Completion::Failed(error))
    }

    /// Returns `true` once a terminal signal has been sent.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.lock().completion.is_some()
    }

    /// Returns the number of subscribers that have not cancelled.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state
            .lock()
            .subscriptions
            .iter()
            .filter(|subscription| subscription.is_active())
            .count()
    }
}

impl<T, E> Publisher for PassthroughSubject<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T, E>>) {
        let mut state = self.state.lock();

        if let Some(completion) = state.completion.clone() {
            drop(state);
            subscriber.on_subscribe(Arc::new(EmptySubscription));
            subscriber.on_complete(completion);
            return;
        }

        let subscription = Arc::new(SubjectSubscription::new(Arc::clone(&subscriber)));
        state.subscriptions.push(Arc::clone(&subscription));
        drop(state);

        trace!("passthrough subject: subscriber attached");
        subscriber.on_subscribe(subscription);
    }
}

impl<T, E> Default for PassthroughSubject<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for PassthroughSubject<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            emission: Arc::clone(&self.emission),
        }
    }
}
