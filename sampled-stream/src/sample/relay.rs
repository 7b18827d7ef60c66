// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::trace;
use core::marker::PhantomData;
use parking_lot::Mutex;
use sampled_core::{Cancellable, Completion, Demand, Subscriber, Subscription};
use std::sync::Arc;

/// What the sampler publisher just did.
#[derive(Debug)]
pub(crate) enum SamplerEvent<F> {
    Signal,
    Finished,
    Failed(F),
}

pub(crate) type TriggerFn<F> = Arc<dyn Fn(SamplerEvent<F>) + Send + Sync>;

struct RelayState<F> {
    trigger: Option<TriggerFn<F>>,
    subscription: Option<Arc<dyn Subscription>>,
    cancelled: bool,
}

/// Subscriber to the sampler publisher.
///
/// Requests unlimited demand and turns every signal, and the terminal signal,
/// into a call of the trigger function. The trigger only holds a weak reference
/// to the coordinator, so a sampler that outlives the sampled subscription does
/// not keep it alive.
pub(crate) struct SamplerRelay<S, F> {
    state: Mutex<RelayState<F>>,
    _signal: PhantomData<fn(S)>,
}

impl<S, F> SamplerRelay<S, F> {
    pub(crate) fn new(trigger: TriggerFn<F>) -> Self {
        Self {
            state: Mutex::new(RelayState {
                trigger: Some(trigger),
                subscription: None,
                cancelled: false,
            }),
            _signal: PhantomData,
        }
    }

    fn current_trigger(&self) -> Option<TriggerFn<F>> {
        self.state.lock().trigger.clone()
    }
}

impl<S, F> Subscriber<S, F> for SamplerRelay<S, F>
where
    F: Send,
{
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        let accepted = {
            let mut state = self.state.lock();
            if state.cancelled || state.subscription.is_some() {
                false
            } else {
                state.subscription = Some(Arc::clone(&subscription));
                true
            }
        };

        if accepted {
            subscription.request(Demand::unlimited());
        } else {
            trace!("sampler relay: already cancelled, rejecting sampler subscription");
            subscription.cancel();
        }
    }

    fn on_value(&self, _signal: S) -> Demand {
        if let Some(trigger) = self.current_trigger() {
            trigger(SamplerEvent::Signal);
        }
        Demand::unlimited()
    }

    fn on_complete(&self, completion: Completion<F>) {
        // Terminal: fire once more, then go inert.
        let trigger = {
            let mut state = self.state.lock();
            state.subscription = None;
            state.trigger.take()
        };

        if let Some(trigger) = trigger {
            trigger(match completion {
                Completion::Finished => SamplerEvent::Finished,
                Completion::Failed(error) => SamplerEvent::Failed(error),
            });
        }
    }
}

impl<S, F> Cancellable for SamplerRelay<S, F>
where
    F: Send,
{
    fn cancel(&self) {
        let subscription = {
            let mut state = self.state.lock();
            state.cancelled = true;
            state.trigger = None;
            state.subscription.take()
        };

        if let Some(subscription) = subscription {
            trace!("sampler relay: cancelling sampler subscription");
            subscription.cancel();
        }
    }
}
