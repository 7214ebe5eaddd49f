use serde::{Deserialize, Serialize};

/// Self-reported willingness, clamped to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WillingnessScore(u8);

impl WillingnessScore {
    pub const MAX: u8 = 100;
    /// Scores below this exit the flow.
    pub const READY_THRESHOLD: u8 = 50;
    /// Scores at or above this skip the primer.
    pub const WORKSHOP_THRESHOLD: u8 = 70;

    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, i64::from(Self::MAX)) as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn band(self) -> WillingnessBand {
        WillingnessBand::for_score(self)
    }
}

impl Default for WillingnessScore {
    fn default() -> Self {
        Self(50)
    }
}

/// Routing band for a willingness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WillingnessBand {
    NotReady,
    Moderate,
    Ready,
}

impl WillingnessBand {
    #[must_use]
    pub fn for_score(score: WillingnessScore) -> Self {
        match score.value() {
            v if v < WillingnessScore::READY_THRESHOLD => WillingnessBand::NotReady,
            v if v < WillingnessScore::WORKSHOP_THRESHOLD => WillingnessBand::Moderate,
            _ => WillingnessBand::Ready,
        }
    }

    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            WillingnessBand::NotReady => {
                "A score below 50 suggests you might not be fully open to this process right now."
            }
            WillingnessBand::Moderate => {
                "A moderate score. We'll start with some exercises to enhance openness."
            }
            WillingnessBand::Ready => "Great! You seem ready to dive in.",
        }
    }
}
