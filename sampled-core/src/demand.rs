// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Backpressure demand.

use core::fmt;
use core::ops::{Add, AddAssign};

/// How many further values a subscriber is willing to accept.
///
/// Demand is never negative. `Unlimited` absorbs every finite amount, so once a
/// subscriber asks for everything it keeps receiving everything.
///
/// # Example
///
/// ```
/// use sampled_core::Demand;
///
/// let mut demand = Demand::max(2) + Demand::max(1);
/// assert_eq!(demand.remaining(), Some(3));
///
/// demand.consume_one();
/// assert_eq!(demand, Demand::max(2));
///
/// demand += Demand::unlimited();
/// assert!(demand.is_unlimited());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Demand {
    /// A finite number of values.
    Finite(u64),
    /// Every value the publisher produces.
    Unlimited,
}

impl Demand {
    /// No demand at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::Finite(0)
    }

    /// Demand for at most `count` values.
    #[must_use]
    pub const fn max(count: u64) -> Self {
        Self::Finite(count)
    }

    /// Demand for every value.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self::Unlimited
    }

    /// Returns `true` if the demand is unlimited.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Returns `true` if at least one more value may be delivered.
    #[must_use]
    pub const fn has_demand(&self) -> bool {
        match self {
            Self::Finite(remaining) => *remaining > 0,
            Self::Unlimited => true,
        }
    }

    /// Returns the remaining finite demand, or `None` when unlimited.
    #[must_use]
    pub const fn remaining(&self) -> Option<u64> {
        match self {
            Self::Finite(remaining) => Some(*remaining),
            Self::Unlimited => None,
        }
    }

    /// Accounts for one delivered value.
    ///
    /// Finite demand saturates at zero; unlimited demand is unaffected.
    pub fn consume_one(&mut self) {
        if let Self::Finite(remaining) = self {
            *remaining = remaining.saturating_sub(1);
        }
    }
}

impl Default for Demand {
    fn default() -> Self {
        Self::none()
    }
}

impl From<u64> for Demand {
    fn from(count: u64) -> Self {
        Self::Finite(count)
    }
}

impl Add for Demand {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => a.checked_add(b).map_or(Self::Unlimited, Self::Finite),
            _ => Self::Unlimited,
        }
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(count) => write!(f, "max({count})"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}
