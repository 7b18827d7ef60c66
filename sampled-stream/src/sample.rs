// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `sample` operator.
//!
//! Latches the most recent value of a primary publisher and releases it when a
//! sampler publisher emits or terminates.

mod config;
mod coordinator;
mod latch;
mod relay;

pub use config::{SampleConfig, SamplerFailure};

use crate::logging::{debug, trace};
use coordinator::{SampleCoordinator, Trigger};
use relay::{SamplerEvent, SamplerRelay, TriggerFn};
use sampled_core::{Cancellable, Publisher, Subscriber, Subscription};
use std::sync::Arc;

/// Publisher returned by [`SampleExt::sample`] and [`SampleExt::sample_with`].
///
/// Constructing it has no side effects. Every subscription gets its own latch,
/// demand counter and pair of upstream subscriptions.
#[derive(Debug, Clone)]
pub struct Sample<P, S>
where
    P: Publisher,
    S: Publisher,
{
    primary: P,
    sampler: S,
    config: SampleConfig,
    convert_failure: Option<fn(S::Failure) -> P::Failure>,
}

impl<P, S> Sample<P, S>
where
    P: Publisher,
    S: Publisher,
{
    /// Samples `primary` whenever `sampler` emits or terminates.
    pub fn new(primary: P, sampler: S) -> Self {
        Self {
            primary,
            sampler,
            config: SampleConfig::default(),
            convert_failure: None,
        }
    }

    /// Like [`new`](Self::new), with explicit options.
    ///
    /// The sampler's failure type must convert into the primary's, because
    /// [`SamplerFailure::Propagate`] forwards it downstream.
    pub fn with_config(primary: P, sampler: S, config: SampleConfig) -> Self
    where
        S::Failure: Into<P::Failure>,
    {
        Self {
            primary,
            sampler,
            config,
            convert_failure: Some(<S::Failure as Into<P::Failure>>::into),
        }
    }

    /// The options this publisher was built with.
    pub fn config(&self) -> SampleConfig {
        self.config
    }
}

impl<P, S> Publisher for Sample<P, S>
where
    P: Publisher,
    S: Publisher,
    P::Output: Send + 'static,
    P::Failure: Send + 'static,
    S::Output: 'static,
    S::Failure: Send + 'static,
{
    type Output = P::Output;
    type Failure = P::Failure;

    fn subscribe(&self, downstream: Arc<dyn Subscriber<P::Output, P::Failure>>) {
        let coordinator = Arc::new(SampleCoordinator::new(downstream.clone(), self.config));

        let weak = Arc::downgrade(&coordinator);
        let propagate = match (self.config.sampler_failure(), self.convert_failure) {
            (SamplerFailure::Propagate, Some(convert)) => Some(convert),
            _ => None,
        };
        let trigger: TriggerFn<S::Failure> = Arc::new(move |event: SamplerEvent<S::Failure>| {
            let Some(coordinator) = weak.upgrade() else {
                return;
            };
            coordinator.on_trigger(match event {
                SamplerEvent::Signal => Trigger::Signal,
                SamplerEvent::Finished => Trigger::SamplerEnded,
                SamplerEvent::Failed(error) => match propagate {
                    Some(convert) => Trigger::SamplerFailed(convert(error)),
                    None => {
                        debug!("sample: sampler failure swallowed, treated as completion");
                        Trigger::SamplerEnded
                    }
                },
            });
        });
        let relay = Arc::new(SamplerRelay::<S::Output, S::Failure>::new(trigger));
        coordinator.attach_sampler(Arc::clone(&relay) as Arc<dyn Cancellable>);

        trace!("sample: subscribing downstream before upstreams");
        // Downstream learns its subscription, and states its demand, before
        // either upstream can emit.
        downstream.on_subscribe(Arc::clone(&coordinator) as Arc<dyn Subscription>);
        self.primary
            .subscribe(Arc::clone(&coordinator) as Arc<dyn Subscriber<P::Output, P::Failure>>);
        self.sampler
            .subscribe(relay as Arc<dyn Subscriber<S::Output, S::Failure>>);
    }
}

/// Extension trait providing the `sample` operator on every publisher.
pub trait SampleExt: Publisher + Sized {
    /// Emits the most recent value of `self` each time `sampler` emits.
    ///
    /// # Behavior
    ///
    /// - Values of `self` are latched in a single slot; a newer value replaces an
    ///   undelivered older one, nothing is buffered beyond that
    /// - Each sampler signal releases the latched value, if any, and empties the slot,
    ///   so a value is never delivered twice
    /// - A value is released only while downstream demand is outstanding; otherwise it
    ///   stays latched for the next signal
    /// - Sampler termination (completion or failure) releases the latched value one
    ///   final time and does not end the output
    /// - Termination of `self` is forwarded downstream; a latched value is discarded
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampled_core::{PassthroughSubject, SinkExt};
    /// use sampled_stream::SampleExt;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let temperature = PassthroughSubject::<f64, ()>::new();
    /// let tick = PassthroughSubject::<(), ()>::new();
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink_seen = Arc::clone(&seen);
    /// let _cancellable = temperature
    ///     .clone()
    ///     .sample(tick.clone())
    ///     .sink(move |t| sink_seen.lock().unwrap().push(t), |_| {});
    ///
    /// temperature.send(20.5).unwrap();
    /// temperature.send(21.0).unwrap();
    /// tick.send(()).unwrap();
    /// tick.send(()).unwrap();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![21.0]);
    /// ```
    ///
    /// # Use Cases
    ///
    /// - Reading a fast sensor at the cadence of a timer
    /// - Refreshing a display with the latest state on each frame signal
    fn sample<S>(self, sampler: S) -> Sample<Self, S>
    where
        S: Publisher,
    {
        Sample::new(self, sampler)
    }

    /// [`sample`](SampleExt::sample) with explicit [`SampleConfig`].
    fn sample_with<S>(self, sampler: S, config: SampleConfig) -> Sample<Self, S>
    where
        S: Publisher,
        S::Failure: Into<Self::Failure>,
    {
        Sample::with_config(self, sampler, config)
    }
}

impl<P> SampleExt for P where P: Publisher + Sized {}
