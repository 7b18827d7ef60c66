// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Sampled
//!
//! Reactive sampling for demand-driven publishers.
//!
//! ## Overview
//!
//! A *primary* publisher produces values faster than anybody wants to read
//! them. A *sampler* publisher decides when a reading is taken. The
//! [`sample`](SampleExt::sample) operator keeps only the most recent primary
//! value and hands it downstream each time the sampler fires, provided the
//! downstream has asked for more.
//!
//! - At most one value is held; newer values replace undelivered ones
//! - No value is ever delivered twice
//! - Sampler termination releases the held value one last time
//! - Primary termination ends the output
//!
//! ## Quick Start
//!
//! ```rust
//! use sampled::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let temperature = PassthroughSubject::<f64, SampledError>::new();
//! let tick = PassthroughSubject::<(), SampledError>::new();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink_seen = Arc::clone(&seen);
//! let _cancellable = temperature
//!     .clone()
//!     .sample(tick.clone())
//!     .sink_values(move |t| sink_seen.lock().unwrap().push(t));
//!
//! temperature.send(20.5)?;
//! temperature.send(21.0)?;
//! tick.send(())?;
//! temperature.send(21.5)?;
//! tick.finish()?;
//!
//! assert_eq!(*seen.lock().unwrap(), vec![21.0, 21.5]);
//! # Ok::<(), SampledError>(())
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

// Re-export the protocol
pub use sampled_core::{
    from_iter, AnyCancellable, Cancellable, Completion, Demand, IntoStreamExt, PassthroughSubject,
    Publisher, PublisherStream, Sequence, Sink, SinkExt, Subscriber, Subscription,
};

// Re-export errors
pub use sampled_error::{Result, ResultExt, SampledError};

// Re-export the operator
pub use sampled_stream::{Sample, SampleConfig, SampleExt, SamplerFailure};

#[cfg(feature = "runtime-tokio")]
pub use sampled_time::{MissedTickBehavior, Timer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        from_iter, Completion, Demand, IntoStreamExt, PassthroughSubject, Publisher, SampleConfig,
        SampleExt, SampledError, SamplerFailure, SinkExt,
    };

    #[cfg(feature = "runtime-tokio")]
    pub use crate::Timer;
}
