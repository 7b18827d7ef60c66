// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// The terminal signal of a publisher.
///
/// A publisher sends at most one `Completion` per subscription, after which it
/// delivers nothing further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<E> {
    /// The publisher produced all of its values.
    Finished,
    /// The publisher terminated abnormally.
    Failed(E),
}

impl<E> Completion<E> {
    /// Returns `true` if this is a `Failed` completion.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Converts the completion into the failure it carries, if any.
    pub fn failure(self) -> Option<E> {
        match self {
            Self::Finished => None,
            Self::Failed(error) => Some(error),
        }
    }

    /// Maps the failure type, leaving `Finished` untouched.
    pub fn map_failure<F, M>(self, map: M) -> Completion<F>
    where
        M: FnOnce(E) -> F,
    {
        match self {
            Self::Finished => Completion::Finished,
            Self::Failed(error) => Completion::Failed(map(error)),
        }
    }
}
