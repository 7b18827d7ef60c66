// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core protocol for the Sampled reactive streaming library.
//!
//! A [`Publisher`] produces values for a [`Subscriber`]. On subscription the
//! publisher hands the subscriber a [`Subscription`], through which the
//! subscriber signals [`Demand`] and may cancel. Values are pushed only while
//! demand is outstanding, followed by at most one [`Completion`].
//!
//! Besides the traits this crate ships the reference producers and consumers
//! used throughout the workspace: [`PassthroughSubject`], [`from_iter`],
//! [`Sink`] and the [`IntoStreamExt`] bridge to `futures::Stream`.

extern crate alloc;

mod logging;

pub mod cancellable;
pub mod completion;
pub mod demand;
pub mod into_stream;
pub mod passthrough_subject;
pub mod publisher;
pub mod sampled_mutex;
pub mod sequence;
pub mod sink;
pub mod subscriber;
pub mod subscription;

pub use self::cancellable::{AnyCancellable, Cancellable};
pub use self::completion::Completion;
pub use self::demand::Demand;
pub use self::into_stream::{IntoStreamExt, PublisherStream};
pub use self::passthrough_subject::PassthroughSubject;
pub use self::publisher::Publisher;
pub use self::sequence::{from_iter, Sequence};
pub use self::sink::{Sink, SinkExt};
pub use self::subscriber::Subscriber;
pub use self::subscription::{EmptySubscription, Subscription};
pub use sampled_error::{Result, SampledError};
