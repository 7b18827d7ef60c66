// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use crate::sampled_mutex::Mutex;
use crate::{AnyCancellable, Cancellable, Completion, Demand, Publisher, Subscriber, Subscription};
use alloc::boxed::Box;
use alloc::sync::Arc;

type ValueHandler<T> = Box<dyn Fn(T) + Send + Sync>;
type CompletionHandler<E> = Box<dyn Fn(Completion<E>) + Send + Sync>;

#[derive(Default)]
struct SinkState {
    subscription: Option<Arc<dyn Subscription>>,
    cancelled: bool,
    completed: bool,
}

/// A subscriber that requests unlimited demand and hands every signal to closures.
///
/// Usually created through [`SinkExt::sink`], which also wires up cancellation.
pub struct Sink<T, E> {
    receive_value: ValueHandler<T>,
    receive_completion: CompletionHandler<E>,
    state: Mutex<SinkState>,
}

impl<T, E> Sink<T, E> {
    /// Creates a sink from a value handler and a completion handler.
    pub fn new<V, C>(receive_value: V, receive_completion: C) -> Self
    where
        V: Fn(T) + Send + Sync + 'static,
        C: Fn(Completion<E>) + Send + Sync + 'static,
    {
        Self {
            receive_value: Box::new(receive_value),
            receive_completion: Box::new(receive_completion),
            state: Mutex::new(SinkState::default()),
        }
    }
}

impl<T, E> Subscriber<T, E> for Sink<T, E> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        let accepted = {
            let mut state = self.state.lock();
            if state.cancelled || state.completed || state.subscription.is_some() {
                false
            } else {
                state.subscription = Some(Arc::clone(&subscription));
                true
            }
        };

        if accepted {
            subscription.request(Demand::unlimited());
        } else {
            trace!("sink: rejecting a second or late subscription");
            subscription.cancel();
        }
    }

    fn on_value(&self, value: T) -> Demand {
        if self.state.lock().cancelled {
            return Demand::none();
        }
        (self.receive_value)(value);
        Demand::none()
    }

    fn on_complete(&self, completion: Completion<E>) {
        let released = {
            let mut state = self.state.lock();
            if state.cancelled || state.completed {
                return;
            }
            state.completed = true;
            state.subscription.take()
        };
        drop(released);
        (self.receive_completion)(completion);
    }
}

impl<T, E> Cancellable for Sink<T, E> {
    fn cancel(&self) {
        let subscription = {
            let mut state = self.state.lock();
            state.cancelled = true;
            state.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

/// Extension trait attaching a [`Sink`] to any publisher.
pub trait SinkExt: Publisher {
    /// Subscribes with unlimited demand and returns the handle that keeps the
    /// subscription alive.
    ///
    /// Dropping the returned [`AnyCancellable`] cancels the subscription.
    fn sink<V, C>(&self, receive_value: V, receive_completion: C) -> AnyCancellable
    where
        V: Fn(Self::Output) + Send + Sync + 'static,
        C: Fn(Completion<Self::Failure>) + Send + Sync + 'static,
        Self::Output: 'static,
        Self::Failure: 'static,
    {
        let sink = Arc::new(Sink::new(receive_value, receive_completion));
        self.subscribe(Arc::clone(&sink) as Arc<dyn Subscriber<Self::Output, Self::Failure>>);
        AnyCancellable::new(sink)
    }

    /// Like [`sink`](SinkExt::sink), ignoring the terminal signal.
    fn sink_values<V>(&self, receive_value: V) -> AnyCancellable
    where
        V: Fn(Self::Output) + Send + Sync + 'static,
        Self::Output: 'static,
        Self::Failure: 'static,
    {
        self.sink(receive_value, |_| {})
    }
}

impl<P> SinkExt for P where P: Publisher + ?Sized {}
