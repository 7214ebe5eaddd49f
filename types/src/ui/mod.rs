//! Presentation options shared by the engine (state ownership) and tui (rendering).
//!
//! Pure data types with no IO, no async, no ratatui dependency.

mod animation;

pub use animation::{AnimPhase, FlashEffect};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}
