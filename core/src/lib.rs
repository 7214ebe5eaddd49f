//! Core domain logic for Reframe.
//!
//! This crate contains the pieces the exercise engines and the flow store
//! share: the randomness seam, the virtual-clock scheduler, and the puzzle
//! and sequence generators.

pub mod puzzle;
pub mod random;
pub mod sequence;
pub mod timeline;

pub use puzzle::{RELIEF_SET_LEN, generate_pattern_puzzle, generate_relief_set};
pub use random::{RandomSource, SequenceRandom, ThreadRandom, pick, shuffle};
pub use sequence::generate_sequence;
pub use timeline::{Timeline, TimerId};
