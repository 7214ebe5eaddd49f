//! Timed exercise engines.
//!
//! Each engine is a synchronous state machine over its own
//! `reframe_core::Timeline`. Callers feed elapsed time through `advance` and
//! user input through the engine's input methods, then drain
//! [`ExerciseEvent`]s and forward them to the flow store. An engine reports
//! its outcome at most once.
//!
//! `advance` drains due timers one at a time. The timeline clock sits at each
//! timer's due time while its handler runs, so follow-ups scheduled by the
//! handler are relative to that moment and can fire within the same call.

pub mod breath;
pub mod pattern;
pub mod relief;
pub mod sequence_tap;

use std::mem;
use std::time::Duration;

use reframe_types::ToastKind;

pub use breath::{BreathCue, BreathPhase};
pub use pattern::{ChoiceResult, PatternPuzzleRun};
pub use relief::ReliefPuzzleRun;
pub use sequence_tap::{SequencePhase, SequenceTap, TapResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseOutcome {
    Success,
    Failure,
    ReturnToMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseEvent {
    Toast {
        message: &'static str,
        kind: ToastKind,
        /// `None` uses the configured default.
        duration: Option<Duration>,
    },
    Finished(ExerciseOutcome),
}

/// Pending events plus the at-most-once conclusion guard.
#[derive(Debug, Default)]
pub(crate) struct Outbox {
    events: Vec<ExerciseEvent>,
    concluded: bool,
}

impl Outbox {
    pub(crate) fn toast(&mut self, message: &'static str, kind: ToastKind) {
        self.events.push(ExerciseEvent::Toast {
            message,
            kind,
            duration: None,
        });
    }

    pub(crate) fn toast_for(&mut self, message: &'static str, kind: ToastKind, duration: Duration) {
        self.events.push(ExerciseEvent::Toast {
            message,
            kind,
            duration: Some(duration),
        });
    }

    /// Record the run's outcome. Later calls are dropped.
    pub(crate) fn conclude(&mut self, outcome: ExerciseOutcome) -> bool {
        if self.concluded {
            tracing::debug!(?outcome, "Ignoring second exercise conclusion");
            return false;
        }
        self.concluded = true;
        self.events.push(ExerciseEvent::Finished(outcome));
        true
    }

    pub(crate) fn is_concluded(&self) -> bool {
        self.concluded
    }

    pub(crate) fn take(&mut self) -> Vec<ExerciseEvent> {
        mem::take(&mut self.events)
    }
}
