// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Subscriber;
use alloc::sync::Arc;

/// A producer of values for [`Subscriber`]s.
///
/// Each call to `subscribe` starts an independent subscription. The publisher
/// must hand the subscriber its [`Subscription`](crate::Subscription) through
/// `on_subscribe` before delivering any value, must never deliver more values
/// than were requested, and sends at most one terminal signal.
pub trait Publisher {
    /// The type of values produced.
    type Output;
    /// The type of failure the publisher may terminate with.
    type Failure;

    /// Attaches `subscriber` to this publisher.
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<Self::Output, Self::Failure>>);
}

impl<P> Publisher for Arc<P>
where
    P: Publisher + ?Sized,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<Self::Output, Self::Failure>>) {
        (**self).subscribe(subscriber);
    }
}

impl<P> Publisher for &P
where
    P: Publisher + ?Sized,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<Self::Output, Self::Failure>>) {
        (**self).subscribe(subscriber);
    }
}
