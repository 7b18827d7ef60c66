// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Demand;

/// The handle a publisher gives a subscriber to control one subscription.
///
/// Requests accumulate: two calls to `request(Demand::max(1))` allow two
/// values. `cancel` is idempotent and, once it returns, the publisher delivers
/// nothing further to that subscriber.
pub trait Subscription: Send + Sync {
    /// Signals that the subscriber will accept `demand` more values.
    fn request(&self, demand: Demand);

    /// Ends the subscription and releases the subscriber.
    fn cancel(&self);
}

/// A subscription with nothing behind it.
///
/// Handed to subscribers of publishers that are already terminated, so the
/// subscriber still receives its handle before the terminal signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySubscription;

impl Subscription for EmptySubscription {
    fn request(&self, _demand: Demand) {}

    fn cancel(&self) {}
}
