//! Core domain types for Reframe.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod clarity;
mod ids;
mod puzzle;
pub mod settings;
mod shape;
mod stage;
mod toast;
pub mod ui;
mod willingness;
mod workshop;

pub use clarity::{AudioClip, ClarityReflection, RecorderState};
pub use ids::{FrameId, JournalEntryId, ToastId};
pub use puzzle::{
    Cell, PATTERN_GRID_CELLS, PatternGrid, PatternPuzzle, RELIEF_GRID_CELLS, ReliefPuzzle,
};
pub use shape::Shape;
pub use stage::{PrimerAttempt, PrimerExercise, ReliefExercise, ReliefSubStage, Stage, Theme};
pub use toast::{Toast, ToastKind};
pub use willingness::{WillingnessBand, WillingnessScore};
pub use workshop::{
    AlternativeFrame, AnchoredFrame, EvidenceKind, EvidenceSlots, MAX_EVIDENCE_SLOTS,
    MIN_EVIDENCE_SLOTS, Rating, WorkshopData,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("text must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::NonEmptyString;

    #[test]
    fn non_empty_string_rejects_whitespace() {
        assert!(NonEmptyString::new("   ").is_err());
        assert!(NonEmptyString::new("\n\t").is_err());
    }

    #[test]
    fn non_empty_string_keeps_original_text() {
        let text = NonEmptyString::new("  padded ").expect("non-empty");
        assert_eq!(text.as_str(), "  padded ");
    }

    #[test]
    fn non_empty_string_deserialize_rejects_blank() {
        let result: Result<NonEmptyString, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
