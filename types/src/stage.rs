//! Stage graph vocabulary.

use serde::{Deserialize, Serialize};

/// The top-level stage of the guided flow. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    WillingnessCalibration,
    OpennessPrimer,
    PerceptionWorkshop,
    ClarityReflection,
    ImmediateReliefPractice,
    ReinforcementBecoming,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::WillingnessCalibration,
        Stage::OpennessPrimer,
        Stage::PerceptionWorkshop,
        Stage::ClarityReflection,
        Stage::ImmediateReliefPractice,
        Stage::ReinforcementBecoming,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Stage::WillingnessCalibration => "Willingness Calibration",
            Stage::OpennessPrimer => "Openness Primer",
            Stage::PerceptionWorkshop => "Perception Workshop",
            Stage::ClarityReflection => "Clarity Reflection",
            Stage::ImmediateReliefPractice => "Immediate Relief",
            Stage::ReinforcementBecoming => "Becoming",
        }
    }

    /// Zero-based position in the canonical stage order.
    #[must_use]
    pub fn ordinal(self) -> usize {
        match self {
            Stage::WillingnessCalibration => 0,
            Stage::OpennessPrimer => 1,
            Stage::PerceptionWorkshop => 2,
            Stage::ClarityReflection => 3,
            Stage::ImmediateReliefPractice => 4,
            Stage::ReinforcementBecoming => 5,
        }
    }
}

/// Which exercise the openness primer presents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimerExercise {
    #[default]
    PatternPuzzle,
    SequenceTap,
}

/// Sub-stage of the immediate-relief practice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliefSubStage {
    #[default]
    Menu,
    PatternPuzzleRelief,
    AudioBreatheRelief,
}

/// An exercise selectable from the relief menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliefExercise {
    PatternPuzzle,
    AudioBreathe,
}

impl ReliefExercise {
    #[must_use]
    pub fn sub_stage(self) -> ReliefSubStage {
        match self {
            ReliefExercise::PatternPuzzle => ReliefSubStage::PatternPuzzleRelief,
            ReliefExercise::AudioBreathe => ReliefSubStage::AudioBreatheRelief,
        }
    }
}

/// Outcome of recording a failed primer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimerAttempt {
    /// One more attempt is allowed; the exercise has switched.
    Retry,
    /// Attempts are exhausted; the flow moved to reinforcement.
    Exiting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
