// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridge from push-based publishers to `futures::Stream`.

use crate::sampled_mutex::Mutex;
use crate::{AnyCancellable, Cancellable, Completion, Demand, Publisher, Subscriber, Subscription};
use alloc::sync::Arc;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;

/// A `Stream` fed by a publisher subscription.
///
/// Values arrive as `Ok`, a failure arrives as a final `Err`, and the stream
/// ends after the publisher completes. Dropping the stream cancels the
/// subscription.
pub struct PublisherStream<T, E> {
    receiver: UnboundedReceiver<Result<T, E>>,
    _cancellable: AnyCancellable,
}

impl<T, E> Stream for PublisherStream<T, E> {
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

struct ChannelSubscriber<T, E> {
    sender: UnboundedSender<Result<T, E>>,
    subscription: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T, E> Subscriber<T, E> for ChannelSubscriber<T, E>
where
    T: Send,
    E: Send,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.subscription.lock() = Some(Arc::clone(&subscription));
        subscription.request(Demand::unlimited());
    }

    fn on_value(&self, value: T) -> Demand {
        if self.sender.unbounded_send(Ok(value)).is_err() {
            // Receiver dropped; nobody is listening any more.
            self.cancel();
        }
        Demand::none()
    }

    fn on_complete(&self, completion: Completion<E>) {
        if let Completion::Failed(error) = completion {
            let _ = self.sender.unbounded_send(Err(error));
        }
        self.sender.close_channel();
        self.subscription.lock().take();
    }
}

impl<T, E> Cancellable for ChannelSubscriber<T, E>
where
    T: Send,
    E: Send,
{
    fn cancel(&self) {
        let subscription = self.subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
        self.sender.close_channel();
    }
}

/// Extension trait turning any publisher into a `futures::Stream`.
///
/// # Example
///
/// ```
/// use futures::executor::block_on;
/// use futures::StreamExt;
/// use sampled_core::{from_iter, IntoStreamExt};
///
/// let values: Vec<Result<i32, ()>> = block_on(from_iter(vec![1, 2]).into_stream().collect());
/// assert_eq!(values, vec![Ok(1), Ok(2)]);
/// ```
pub trait IntoStreamExt: Publisher {
    /// Subscribes with unlimited demand and exposes the signals as a stream.
    fn into_stream(&self) -> PublisherStream<Self::Output, Self::Failure>
    where
        Self::Output: Send + 'static,
        Self::Failure: Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded();
        let subscriber = Arc::new(ChannelSubscriber {
            sender,
            subscription: Mutex::new(None),
        });
        self.subscribe(Arc::clone(&subscriber) as Arc<dyn Subscriber<Self::Output, Self::Failure>>);

        PublisherStream {
            receiver,
            _cancellable: AnyCancellable::new(subscriber),
        }
    }
}

impl<P> IntoStreamExt for P where P: Publisher + ?Sized {}
