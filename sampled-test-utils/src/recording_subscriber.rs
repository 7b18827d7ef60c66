// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use sampled_core::{Completion, Demand, Subscriber, Subscription};
use std::sync::Arc;

/// One signal observed by a [`RecordingSubscriber`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestEvent<T, E> {
    Subscribed,
    Value(T),
    Completed(Completion<E>),
}

type ValueHook<T> = Box<dyn Fn(&T, &dyn Subscription) + Send + Sync>;

/// A subscriber that records every signal it receives.
///
/// The demand requested on subscription and the demand returned from each
/// `on_value` are configurable, so tests can drive a publisher through any
/// backpressure scenario. An optional hook runs inside `on_value` with the
/// subscription handle, for re-entrancy tests.
///
/// # Example
///
/// ```rust
/// use sampled_core::{from_iter, Demand, Publisher};
/// use sampled_test_utils::RecordingSubscriber;
///
/// let recorder = RecordingSubscriber::<i32, ()>::with_demand(Demand::max(2));
/// from_iter::<_, ()>(vec![1, 2, 3]).subscribe(recorder.clone());
///
/// assert_eq!(recorder.values(), vec![1, 2]);
/// assert!(recorder.completion().is_none());
/// ```
pub struct RecordingSubscriber<T, E> {
    initial_demand: Demand,
    demand_per_value: Demand,
    hook: Option<ValueHook<T>>,
    events: Mutex<Vec<TestEvent<T, E>>>,
    subscription: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T, E> RecordingSubscriber<T, E> {
    /// Requests unlimited demand on subscription.
    #[must_use]
    pub fn unlimited() -> Arc<Self> {
        Self::with_demand(Demand::unlimited())
    }

    /// Requests `initial_demand` on subscription and nothing more per value.
    #[must_use]
    pub fn with_demand(initial_demand: Demand) -> Arc<Self> {
        Self::with_demands(initial_demand, Demand::none())
    }

    /// Requests `initial_demand` on subscription and `demand_per_value` from each `on_value`.
    #[must_use]
    pub fn with_demands(initial_demand: Demand, demand_per_value: Demand) -> Arc<Self> {
        Arc::new(Self::build(initial_demand, demand_per_value, None))
    }

    /// Like [`with_demand`](Self::with_demand), running `hook` inside every `on_value`.
    #[must_use]
    pub fn with_hook<H>(initial_demand: Demand, hook: H) -> Arc<Self>
    where
        H: Fn(&T, &dyn Subscription) + Send + Sync + 'static,
    {
        Arc::new(Self::build(
            initial_demand,
            Demand::none(),
            Some(Box::new(hook)),
        ))
    }

    fn build(initial_demand: Demand, demand_per_value: Demand, hook: Option<ValueHook<T>>) -> Self {
        Self {
            initial_demand,
            demand_per_value,
            hook,
            events: Mutex::new(Vec::new()),
            subscription: Mutex::new(None),
        }
    }

    /// Requests more values through the stored subscription.
    pub fn request(&self, demand: Demand) {
        let subscription = self.subscription.lock().clone();
        if let Some(subscription) = subscription {
            subscription.request(demand);
        }
    }

    /// Cancels through the stored subscription and forgets it.
    pub fn cancel(&self) {
        let subscription = self.subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }

    /// Returns `true` once `on_subscribe` was received.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.events
            .lock()
            .iter()
            .any(|event| matches!(event, TestEvent::Subscribed))
    }

    /// Number of values received so far.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, TestEvent::Value(_)))
            .count()
    }
}

impl<T: Clone, E: Clone> RecordingSubscriber<T, E> {
    /// Every signal received, in order.
    #[must_use]
    pub fn events(&self) -> Vec<TestEvent<T, E>> {
        self.events.lock().clone()
    }

    /// The values received, in order.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                TestEvent::Value(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// The terminal signal, if one was received.
    #[must_use]
    pub fn completion(&self) -> Option<Completion<E>> {
        self.events.lock().iter().find_map(|event| match event {
            TestEvent::Completed(completion) => Some(completion.clone()),
            _ => None,
        })
    }

    /// Number of terminal signals received; anything above one is a protocol violation.
    #[must_use]
    pub fn completion_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, TestEvent::Completed(_)))
            .count()
    }
}

impl<T, E> Subscriber<T, E> for RecordingSubscriber<T, E>
where
    T: Send,
    E: Send,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        self.events.lock().push(TestEvent::Subscribed);
        *self.subscription.lock() = Some(Arc::clone(&subscription));
        if self.initial_demand.has_demand() {
            subscription.request(self.initial_demand);
        }
    }

    fn on_value(&self, value: T) -> Demand {
        if let Some(hook) = &self.hook {
            let subscription = self.subscription.lock().clone();
            if let Some(subscription) = subscription {
                hook(&value, subscription.as_ref());
            }
        }
        self.events.lock().push(TestEvent::Value(value));
        self.demand_per_value
    }

    fn on_complete(&self, completion: Completion<E>) {
        self.events.lock().push(TestEvent::Completed(completion));
        self.subscription.lock().take();
    }
}
