//! Resolved configuration types shared across crates.
//!
//! These types represent fully-validated, resolved configuration state.
//! Raw TOML deserialization structs (with `Option` fields) stay private in
//! `reframe-config`. The config loader resolves them into these types at the
//! parse boundary.
//!
//! Existence of a value is the proof of its validity.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        max: u64,
        value: u64,
    },
    #[error("breath total ({total_secs}s) is shorter than one cycle ({cycle_secs}s)")]
    TotalShorterThanCycle { total_secs: u64, cycle_secs: u64 },
}

fn non_zero(field: &'static str, value: u64) -> Result<u64, SettingsError> {
    if value == 0 {
        Err(SettingsError::Zero { field })
    } else {
        Ok(value)
    }
}

fn at_most(field: &'static str, value: u64, max: u64) -> Result<u64, SettingsError> {
    if value > max {
        Err(SettingsError::TooLarge { field, max, value })
    } else {
        Ok(value)
    }
}

/// Whether phase cues are spoken or signalled by tone alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CueVoice {
    #[default]
    Spoken,
    ChimeOnly,
}

/// Validated breath-cue cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathSettings {
    total: Duration,
    phases: [Duration; 4],
    voice: CueVoice,
}

impl BreathSettings {
    pub const DEFAULT_TOTAL_SECS: u64 = 90;
    pub const DEFAULT_PHASE_SECS: u64 = 3;

    /// `phase_secs` is inhale, hold, exhale, rest.
    pub fn new(
        total_secs: u64,
        phase_secs: [u64; 4],
        voice: CueVoice,
    ) -> Result<Self, SettingsError> {
        const PHASE_FIELDS: [&str; 4] = ["inhale_secs", "hold_secs", "exhale_secs", "rest_secs"];
        let total_secs = non_zero("total_secs", total_secs)?;
        for (field, secs) in PHASE_FIELDS.iter().zip(phase_secs) {
            non_zero(field, secs)?;
        }
        let cycle_secs: u64 = phase_secs.iter().sum();
        if total_secs < cycle_secs {
            return Err(SettingsError::TotalShorterThanCycle {
                total_secs,
                cycle_secs,
            });
        }
        Ok(Self {
            total: Duration::from_secs(total_secs),
            phases: phase_secs.map(Duration::from_secs),
            voice,
        })
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Phase durations in cycle order: inhale, hold, exhale, rest.
    #[must_use]
    pub fn phases(&self) -> [Duration; 4] {
        self.phases
    }

    #[must_use]
    pub fn voice(&self) -> CueVoice {
        self.voice
    }

    #[must_use]
    pub fn with_voice(mut self, voice: CueVoice) -> Self {
        self.voice = voice;
        self
    }
}

impl Default for BreathSettings {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(Self::DEFAULT_TOTAL_SECS),
            phases: [Duration::from_secs(Self::DEFAULT_PHASE_SECS); 4],
            voice: CueVoice::Spoken,
        }
    }
}

/// Validated sequence-tap dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSettings {
    length: usize,
    positions: usize,
}

impl SequenceSettings {
    /// Positions map to number keys, so at most nine.
    pub const MAX_POSITIONS: u64 = 9;
    pub const MAX_LENGTH: u64 = 16;

    pub fn new(length: u64, positions: u64) -> Result<Self, SettingsError> {
        let length = at_most("length", non_zero("length", length)?, Self::MAX_LENGTH)?;
        let positions = at_most(
            "positions",
            non_zero("positions", positions)?,
            Self::MAX_POSITIONS,
        )?;
        Ok(Self {
            length: length as usize,
            positions: positions as usize,
        })
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn positions(&self) -> usize {
        self.positions
    }
}

impl Default for SequenceSettings {
    fn default() -> Self {
        Self {
            length: 4,
            positions: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastSettings {
    duration: Duration,
}

impl ToastSettings {
    pub const DEFAULT_DURATION_MS: u64 = 3000;

    pub fn new(duration_ms: u64) -> Result<Self, SettingsError> {
        let ms = non_zero("duration_ms", duration_ms)?;
        Ok(Self {
            duration: Duration::from_millis(ms),
        })
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(Self::DEFAULT_DURATION_MS),
        }
    }
}
