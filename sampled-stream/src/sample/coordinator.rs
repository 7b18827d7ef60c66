// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Demand and latch state machine behind one sampled subscription.
//!
//! The coordinator is the primary's subscriber and the downstream's
//! subscription at the same time. Two independent producers feed it: the
//! primary writes the latch from its own context while the sampler relay fires
//! triggers from another. All state sits behind one `Mutex`, which is never
//! held while calling out of the coordinator.
//!
//! Downstream signals go through a single drain loop guarded by a
//! `ReentrantMutex`:
//!
//! - another thread that wants to deliver waits until the running delivery has
//!   returned and its demand has been applied;
//! - the same thread re-entering from inside `on_value` (a synchronous request,
//!   sampler signal or primary completion) only records what happened, and the
//!   running loop picks it up after `on_value` returns.
//!
//! A value is released only when the latch is occupied **and** downstream
//! demand is positive. A trigger without demand leaves the value latched for the
//! next trigger; a terminal trigger without demand arms a final flush that the
//! next `request` honours.

use super::config::SampleConfig;
use super::latch::Latch;
use crate::logging::{debug, trace};
use parking_lot::{Mutex, ReentrantMutex};
use sampled_core::{Cancellable, Completion, Demand, Subscriber, Subscription};
use std::sync::Arc;

/// Why the coordinator is asked to release the latch.
#[derive(Debug)]
pub(crate) enum Trigger<E> {
    /// The sampler emitted a signal.
    Signal,
    /// The sampler terminated and its failure, if any, is swallowed.
    SamplerEnded,
    /// The sampler failed and the failure terminates the output.
    SamplerFailed(E),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Active,
    Terminated,
    Cancelled,
}

struct CoordinatorState<T, E> {
    phase: Phase,
    downstream: Option<Arc<dyn Subscriber<T, E>>>,
    latch: Latch<T>,
    demand: Demand,
    primary: Option<Arc<dyn Subscription>>,
    sampler: Option<Arc<dyn Cancellable>>,
    sampler_ended: bool,
    delivering: bool,
    pending_trigger: bool,
    final_flush_armed: bool,
    pending_completion: Option<Completion<E>>,
}

enum Action<T, E> {
    Deliver {
        downstream: Arc<dyn Subscriber<T, E>>,
        value: T,
    },
    Complete {
        downstream: Arc<dyn Subscriber<T, E>>,
        completion: Completion<E>,
        primary: Option<Arc<dyn Subscription>>,
        sampler: Option<Arc<dyn Cancellable>>,
    },
}

impl<T, E> CoordinatorState<T, E> {
    fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    fn release(&mut self) -> Option<Action<T, E>> {
        let value = self.latch.take()?;
        let downstream = self.downstream.clone()?;
        self.demand.consume_one();
        Some(Action::Deliver { downstream, value })
    }

    // Decides the next downstream signal; called with the state lock held.
    fn next_action(&mut self) -> Option<Action<T, E>> {
        if !self.is_active() {
            return None;
        }

        if let Some(completion) = self.pending_completion.take() {
            self.phase = Phase::Terminated;
            self.latch.clear();
            self.pending_trigger = false;
            self.final_flush_armed = false;
            let downstream = self.downstream.take()?;
            return Some(Action::Complete {
                downstream,
                completion,
                primary: self.primary.take(),
                sampler: self.sampler.take(),
            });
        }

        let deliverable = self.latch.is_occupied() && self.demand.has_demand();

        if self.pending_trigger {
            self.pending_trigger = false;
            if deliverable {
                self.final_flush_armed = false;
                return self.release();
            }
            if self.sampler_ended && self.latch.is_occupied() {
                trace!("sample: final flush deferred until downstream demand arrives");
                self.final_flush_armed = true;
            } else if self.latch.is_occupied() {
                trace!("sample: trigger without downstream demand, value stays latched");
            } else {
                trace!("sample: trigger with empty latch ignored");
            }
            return None;
        }

        if self.final_flush_armed && deliverable {
            self.final_flush_armed = false;
            return self.release();
        }

        None
    }
}

fn detach(primary: Option<Arc<dyn Subscription>>, sampler: Option<Arc<dyn Cancellable>>) {
    if let Some(sampler) = sampler {
        sampler.cancel();
    }
    if let Some(primary) = primary {
        primary.cancel();
    }
}

/// Clears the `delivering` flag once a downstream callout returns or unwinds.
struct DeliveryGuard<'a, T, E>(&'a Mutex<CoordinatorState<T, E>>);

impl<T, E> Drop for DeliveryGuard<'_, T, E> {
    fn drop(&mut self) {
        self.0.lock().delivering = false;
    }
}

/// The subscription handed downstream by [`Sample`](crate::Sample).
pub(crate) struct SampleCoordinator<T, E> {
    config: SampleConfig,
    serial: ReentrantMutex<()>,
    state: Mutex<CoordinatorState<T, E>>,
}

impl<T, E> SampleCoordinator<T, E> {
    pub(crate) fn new(downstream: Arc<dyn Subscriber<T, E>>, config: SampleConfig) -> Self {
        Self {
            config,
            serial: ReentrantMutex::new(()),
            state: Mutex::new(CoordinatorState {
                phase: Phase::Active,
                downstream: Some(downstream),
                latch: Latch::empty(),
                demand: Demand::none(),
                primary: None,
                sampler: None,
                sampler_ended: false,
                delivering: false,
                pending_trigger: false,
                final_flush_armed: false,
                pending_completion: None,
            }),
        }
    }

    /// Registers the relay so that cancellation can detach it from the sampler.
    pub(crate) fn attach_sampler(&self, relay: Arc<dyn Cancellable>) {
        let rejected = {
            let mut state = self.state.lock();
            if state.is_active() && !state.sampler_ended {
                state.sampler = Some(relay);
                None
            } else {
                Some(relay)
            }
        };
        if let Some(relay) = rejected {
            relay.cancel();
        }
    }

    /// Entry point for the sampler relay.
    pub(crate) fn on_trigger(&self, trigger: Trigger<E>) {
        {
            let mut state = self.state.lock();
            if !state.is_active() {
                return;
            }
            match trigger {
                Trigger::Signal => {
                    trace!("sample: sampler signal");
                    state.pending_trigger = true;
                }
                Trigger::SamplerEnded => {
                    debug!("sample: sampler terminated");
                    state.sampler_ended = true;
                    state.sampler = None;
                    if self.config.flush_on_sampler_end() {
                        state.pending_trigger = true;
                    }
                }
                Trigger::SamplerFailed(error) => {
                    debug!("sample: sampler failed, terminating output");
                    state.sampler_ended = true;
                    state.sampler = None;
                    if state.pending_completion.is_none() {
                        state.pending_completion = Some(Completion::Failed(error));
                    }
                }
            }
        }
        self.drain();
    }

    fn drain(&self) {
        let serial = self.serial.lock();

        loop {
            let action = {
                let mut state = self.state.lock();
                if state.delivering {
                    // Re-entered from inside a downstream callback on this thread.
                    return;
                }
                let action = state.next_action();
                if action.is_some() {
                    state.delivering = true;
                }
                action
            };

            match action {
                None => return,
                Some(Action::Deliver { downstream, value }) => {
                    trace!("sample: releasing latched value downstream");
                    let delivery = DeliveryGuard(&self.state);
                    let additional = downstream.on_value(value);
                    drop(delivery);
                    let mut state = self.state.lock();
                    if state.is_active() {
                        state.demand += additional;
                    }
                }
                Some(Action::Complete {
                    downstream,
                    completion,
                    primary,
                    sampler,
                }) => {
                    debug!(failed = completion.is_failure(), "sample: forwarding termination");
                    let delivery = DeliveryGuard(&self.state);
                    downstream.on_complete(completion);
                    drop(delivery);
                    drop(serial);
                    detach(primary, sampler);
                    return;
                }
            }
        }
    }
}

impl<T, E> Subscription for SampleCoordinator<T, E>
where
    T: Send,
    E: Send,
{
    fn request(&self, demand: Demand) {
        let flush_pending = {
            let mut state = self.state.lock();
            if !state.is_active() {
                return;
            }
            state.demand += demand;
            trace!(demand = %state.demand, "sample: downstream request");
            state.final_flush_armed
        };

        if flush_pending {
            self.drain();
        }
    }

    fn cancel(&self) {
        // Waits for a delivery running on another thread, so nothing reaches
        // downstream once this returns. Upstreams are cancelled after the
        // serial lock is released: a source may hold its own emission lock
        // while waiting for ours.
        let serial = self.serial.lock();

        let (downstream, primary, sampler) = {
            let mut state = self.state.lock();
            if !state.is_active() {
                return;
            }
            state.phase = Phase::Cancelled;
            state.latch.clear();
            state.pending_trigger = false;
            state.final_flush_armed = false;
            state.pending_completion = None;
            (
                state.downstream.take(),
                state.primary.take(),
                state.sampler.take(),
            )
        };

        drop(serial);

        debug!("sample: cancelled by downstream");
        detach(primary, sampler);
        drop(downstream);
    }
}

impl<T, E> Subscriber<T, E> for SampleCoordinator<T, E>
where
    T: Send,
    E: Send,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        let accepted = {
            let mut state = self.state.lock();
            if state.is_active() && state.primary.is_none() {
                state.primary = Some(Arc::clone(&subscription));
                true
            } else {
                false
            }
        };

        if accepted {
            // Latching never applies backpressure to the primary.
            subscription.request(Demand::unlimited());
        } else {
            subscription.cancel();
        }
    }

    fn on_value(&self, value: T) -> Demand {
        let mut state = self.state.lock();
        if state.is_active() && state.latch.store(value) {
            trace!("sample: undelivered value overwritten");
        }
        Demand::none()
    }

    fn on_complete(&self, completion: Completion<E>) {
        {
            let mut state = self.state.lock();
            if !state.is_active() || state.pending_completion.is_some() {
                return;
            }
            state.primary = None;
            state.pending_completion = Some(completion);
        }
        self.drain();
    }
}
