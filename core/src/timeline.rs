//! Virtual-clock scheduler.
//!
//! A `Timeline` holds pending timers keyed by their due time on a virtual
//! clock. Owners drain due entries with [`Timeline::pop_due`], which moves the
//! clock to each entry's due time before returning it, so handlers that
//! schedule follow-ups do so relative to the moment the timer fired. The
//! application advances the clock by the wall-clock frame delta; tests
//! fast-forward it directly.
//!
//! Cancelling removes the entry. A cancelled timer can never fire.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    due: Duration,
    item: T,
}

#[derive(Debug, Clone)]
pub struct Timeline<T> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedule `item` to fire `after` from now.
    pub fn schedule(&mut self, after: Duration, item: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: self.now.saturating_add(after),
            item,
        });
        id
    }

    /// Remove a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Time until the earliest pending timer, if any.
    #[must_use]
    pub fn next_due_in(&self) -> Option<Duration> {
        self.entries
            .iter()
            .map(|entry| entry.due.saturating_sub(self.now))
            .min()
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// Ties fire in scheduling order. The clock moves forward to the entry's
    /// due time (never backward).
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.id))
            .map(|(index, _)| index)?;
        let entry = self.entries.remove(position);
        self.now = self.now.max(entry.due);
        Some((entry.id, entry.item))
    }

    /// Move the clock to `until` once all due timers have been drained.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
