//! Randomness seam.
//!
//! Generators and the flow store draw from a `RandomSource` so tests can pin
//! every choice. Production uses the thread-local generator from `rand`.

/// Source of uniform integer draws.
pub trait RandomSource: Send {
    /// Uniform value in `0..upper`. Returns 0 when `upper <= 1`.
    fn below(&mut self, upper: usize) -> usize;
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        rand::random_range(0..upper)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Each draw is reduced modulo the requested bound, so `[0]` always picks the
/// first option and `[usize::MAX]` always picks the last.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<usize>,
    cursor: usize,
}

impl SequenceRandom {
    #[must_use]
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of draws served so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn below(&mut self, upper: usize) -> usize {
        if upper <= 1 || self.values.is_empty() {
            self.cursor += 1;
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        if value == usize::MAX {
            upper - 1
        } else {
            value % upper
        }
    }
}

/// Fisher-Yates shuffle in place.
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// Uniform pick from a slice.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.below(items.len()))
}
