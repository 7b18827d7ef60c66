// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Single-slot holder for the most recent primary value.
///
/// A new value always replaces the previous one; nothing is ever queued.
/// Callers serialize access through the coordinator's state lock.
#[derive(Debug)]
pub(crate) struct Latch<T> {
    slot: Option<T>,
}

impl<T> Latch<T> {
    pub(crate) const fn empty() -> Self {
        Self { slot: None }
    }

    /// Stores `value`, returning `true` if an undelivered value was discarded.
    pub(crate) fn store(&mut self, value: T) -> bool {
        self.slot.replace(value).is_some()
    }

    /// Removes and returns the held value.
    pub(crate) fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    pub(crate) const fn is_occupied(&self) -> bool {
        self.slot.is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::Latch;

    #[test]
    fn store_overwrites_instead_of_queueing() {
        let mut latch = Latch::empty();

        assert!(!latch.store(1));
        assert!(latch.store(2));

        assert_eq!(latch.take(), Some(2));
        assert_eq!(latch.take(), None);
    }

    #[test]
    fn clear_discards_the_value() {
        let mut latch = Latch::empty();
        latch.store("reading");

        latch.clear();

        assert!(!latch.is_occupied());
    }
}
