use std::time::Duration;

use crate::NonEmptyString;

/// Recorded audio returned by a recorder port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecorderState {
    #[default]
    Inactive,
    Recording,
    Paused,
    Finished,
}

/// The user's reflection in the clarity stage. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClarityReflection {
    #[default]
    Empty,
    Text(NonEmptyString),
    Audio(AudioClip),
}

impl ClarityReflection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, ClarityReflection::Empty)
    }
}
