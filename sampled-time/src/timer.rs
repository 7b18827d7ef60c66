// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::{debug, trace};
use parking_lot::{Mutex, ReentrantMutex};
use sampled_core::{Completion, Demand, EmptySubscription, Publisher, Subscriber, Subscription};
use sampled_error::{Result, SampledError};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};

/// A publisher of periodic ticks.
///
/// Each subscription spawns its own task on the tokio runtime. The first tick
/// arrives one `period` after subscribing. A tick that finds the subscriber
/// without outstanding demand is dropped, like any other hot source. The timer
/// never fails; it finishes only when built [`with_limit`](Self::with_limit).
///
/// # Example
///
/// ```rust
/// use sampled_core::{IntoStreamExt, PassthroughSubject};
/// use sampled_stream::SampleExt;
/// use sampled_time::Timer;
/// use futures::StreamExt;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let readings = PassthroughSubject::<u32, sampled_error::SampledError>::new();
/// let mut sampled = readings
///     .clone()
///     .sample(Timer::every(Duration::from_millis(10)))
///     .into_stream();
///
/// readings.send(1).unwrap();
/// readings.send(2).unwrap();
///
/// assert_eq!(sampled.next().await.unwrap().unwrap(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Timer {
    period: Duration,
    limit: Option<u64>,
    missed_tick_behavior: MissedTickBehavior,
    handle: Option<Handle>,
}

impl Timer {
    /// Ticks every `period` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero. Use [`try_every`](Self::try_every) to get an
    /// error instead.
    #[must_use]
    pub fn every(period: Duration) -> Self {
        assert!(!period.is_zero(), "Timer period must be non-zero");
        Self {
            period,
            limit: None,
            missed_tick_behavior: MissedTickBehavior::Skip,
            handle: Handle::try_current().ok(),
        }
    }

    /// Ticks every `period` on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SampledError::Timer` if `period` is zero or if called outside
    /// a tokio runtime.
    pub fn try_every(period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(SampledError::timer(period, "period must be non-zero"));
        }
        let handle = Handle::try_current()
            .map_err(|_| SampledError::timer(period, "no tokio runtime available"))?;
        Ok(Self {
            period,
            limit: None,
            missed_tick_behavior: MissedTickBehavior::Skip,
            handle: Some(handle),
        })
    }

    /// Finishes each subscription after `ticks` delivered ticks.
    #[must_use]
    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.limit = Some(ticks);
        self
    }

    /// How ticks missed by a stalled runtime are made up. Defaults to
    /// [`MissedTickBehavior::Skip`].
    #[must_use]
    pub fn with_missed_tick_behavior(mut self, behavior: MissedTickBehavior) -> Self {
        self.missed_tick_behavior = behavior;
        self
    }

    /// Spawns subscriptions on `handle` instead of the runtime current at construction.
    #[must_use]
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}

impl Publisher for Timer {
    type Output = Instant;
    type Failure = Infallible;

    fn subscribe(&self, subscriber: Arc<dyn Subscriber<Instant, Infallible>>) {
        let Some(handle) = self.handle.clone().or_else(|| Handle::try_current().ok()) else {
            debug!("timer: no tokio runtime, finishing subscriber");
            subscriber.on_subscribe(Arc::new(EmptySubscription));
            subscriber.on_complete(Completion::Finished);
            return;
        };

        let subscription = Arc::new(TimerSubscription {
            state: Mutex::new(TimerState {
                subscriber: Some(Arc::clone(&subscriber)),
                demand: Demand::none(),
                task: None,
            }),
            emission: ReentrantMutex::new(()),
        });

        subscriber.on_subscribe(Arc::clone(&subscription) as Arc<dyn Subscription>);
        if subscription.state.lock().subscriber.is_none() {
            // Cancelled from inside on_subscribe.
            return;
        }
        if self.limit == Some(0) {
            subscription.finish();
            return;
        }

        let task = handle.spawn(run(
            Arc::clone(&subscription),
            self.period,
            self.limit,
            self.missed_tick_behavior,
        ));
        subscription.attach(task);
    }
}

async fn run(
    subscription: Arc<TimerSubscription>,
    period: Duration,
    limit: Option<u64>,
    missed_tick_behavior: MissedTickBehavior,
) {
    let mut interval = interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(missed_tick_behavior);
    let mut delivered = 0u64;

    loop {
        let tick = interval.tick().await.into_std();
        match subscription.emit(tick) {
            Emission::Delivered => {
                delivered += 1;
                if limit == Some(delivered) {
                    subscription.finish();
                    return;
                }
            }
            Emission::NoDemand => {
                trace!("timer: tick without demand dropped");
            }
            Emission::Detached => return,
        }
    }
}

enum Emission {
    Delivered,
    NoDemand,
    Detached,
}

struct TimerState {
    subscriber: Option<Arc<dyn Subscriber<Instant, Infallible>>>,
    demand: Demand,
    task: Option<JoinHandle<()>>,
}

struct TimerSubscription {
    // Held across every downstream callout; `cancel` takes it too.
    emission: ReentrantMutex<()>,
    state: Mutex<TimerState>,
}

impl TimerSubscription {
    fn attach(&self, task: JoinHandle<()>) {
        let mut state = self.state.lock();
        if state.subscriber.is_some() {
            state.task = Some(task);
        } else {
            task.abort();
        }
    }

    fn emit(&self, tick: Instant) -> Emission {
        let _emission = self.emission.lock();
        let subscriber = {
            let mut state = self.state.lock();
            let Some(subscriber) = state.subscriber.clone() else {
                return Emission::Detached;
            };
            if !state.demand.has_demand() {
                return Emission::NoDemand;
            }
            state.demand.consume_one();
            subscriber
        };

        let additional = subscriber.on_value(tick);
        self.state.lock().demand += additional;
        Emission::Delivered
    }

    fn finish(&self) {
        let _emission = self.emission.lock();
        let subscriber = {
            let mut state = self.state.lock();
            state.task = None;
            state.subscriber.take()
        };
        if let Some(subscriber) = subscriber {
            debug!("timer: tick limit reached, finishing");
            subscriber.on_complete(Completion::Finished);
        }
    }
}

impl Subscription for TimerSubscription {
    fn request(&self, demand: Demand) {
        let mut state = self.state.lock();
        if state.subscriber.is_some() {
            state.demand += demand;
        }
    }

    fn cancel(&self) {
        // Waits for a tick being delivered on the timer task.
        let _emission = self.emission.lock();
        let (subscriber, task) = {
            let mut state = self.state.lock();
            (state.subscriber.take(), state.task.take())
        };
        if let Some(task) = task {
            trace!("timer: cancelled, aborting tick task");
            task.abort();
        }
        drop(subscriber);
    }
}
