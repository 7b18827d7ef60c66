// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Synchronization primitives shared by publishers and operators.
//!
//! `parking_lot` locks never poison, so a panicking subscriber callback cannot
//! wedge the publisher that invoked it. `ReentrantMutex` serializes signal
//! delivery while still letting a subscriber call back into its publisher on
//! the same thread.

pub use parking_lot::{Mutex, MutexGuard, ReentrantMutex, ReentrantMutexGuard};
