use crate::random::RandomSource;

/// `length` independent uniform draws from `0..positions`. Repeats are allowed.
pub fn generate_sequence(rng: &mut dyn RandomSource, length: usize, positions: usize) -> Vec<usize> {
    (0..length).map(|_| rng.below(positions)).collect()
}
