//! Perception workshop data: evidence lists, alternative frames, anchored entries.

use serde::{Deserialize, Serialize};

use crate::ids::{FrameId, JournalEntryId};

pub const MIN_EVIDENCE_SLOTS: usize = 2;
pub const MAX_EVIDENCE_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceKind {
    Against,
    For,
}

/// Evidence entries with a slot count held in `MIN_EVIDENCE_SLOTS..=MAX_EVIDENCE_SLOTS`.
///
/// Every mutator reports whether it changed anything; out-of-range requests are no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceSlots(Vec<String>);

impl Default for EvidenceSlots {
    fn default() -> Self {
        Self(vec![String::new(); MIN_EVIDENCE_SLOTS])
    }
}

impl EvidenceSlots {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn set(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn push_slot(&mut self) -> bool {
        if self.0.len() >= MAX_EVIDENCE_SLOTS {
            return false;
        }
        self.0.push(String::new());
        true
    }

    pub fn remove_slot(&mut self, index: usize) -> bool {
        if self.0.len() <= MIN_EVIDENCE_SLOTS || index >= self.0.len() {
            return false;
        }
        self.0.remove(index);
        true
    }
}

/// User rating of a frame, clamped to `0..=5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, i64::from(Self::MAX)) as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            Err(format!("rating {value} exceeds {}", Self::MAX))
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// A sentence stem the user completes and rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternativeFrame {
    id: FrameId,
    template: String,
    pub completion: String,
    pub rating: Rating,
}

impl AlternativeFrame {
    #[must_use]
    pub fn new(id: FrameId, template: impl Into<String>) -> Self {
        Self {
            id,
            template: template.into(),
            completion: String::new(),
            rating: Rating::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> FrameId {
        self.id
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        !self.completion.trim().is_empty()
    }

    /// Template with its trailing ellipsis removed, joined to the completion.
    #[must_use]
    pub fn full_text(&self) -> String {
        format!("{} {}", self.template.replace('…', ""), self.completion)
    }
}

/// A frame committed to the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchoredFrame {
    pub id: JournalEntryId,
    pub statement: String,
    pub completion: String,
    pub full_text: String,
    pub rating: Rating,
    /// RFC 3339 timestamp of the anchoring.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopData {
    pub interpretation: String,
    pub evidence_against: EvidenceSlots,
    pub evidence_for: EvidenceSlots,
    pub alternative_frames: Vec<AlternativeFrame>,
    pub anchored_frame: Option<AnchoredFrame>,
}

impl WorkshopData {
    pub const DEFAULT_TEMPLATES: [&'static str; 3] = [
        "This is temporary because…",
        "This stage is teaching me…",
        "This experience confirms that I…",
    ];

    #[must_use]
    pub fn evidence(&self, kind: EvidenceKind) -> &EvidenceSlots {
        match kind {
            EvidenceKind::Against => &self.evidence_against,
            EvidenceKind::For => &self.evidence_for,
        }
    }

    pub fn evidence_mut(&mut self, kind: EvidenceKind) -> &mut EvidenceSlots {
        match kind {
            EvidenceKind::Against => &mut self.evidence_against,
            EvidenceKind::For => &mut self.evidence_for,
        }
    }

    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut AlternativeFrame> {
        self.alternative_frames.iter_mut().find(|frame| frame.id == id)
    }

    /// Highest-rated completed frame; ties resolve to the earliest frame.
    #[must_use]
    pub fn best_completed_frame(&self) -> Option<&AlternativeFrame> {
        self.alternative_frames
            .iter()
            .filter(|frame| frame.is_completed())
            .fold(None, |best: Option<&AlternativeFrame>, frame| match best {
                Some(current) if current.rating >= frame.rating => Some(current),
                _ => Some(frame),
            })
    }
}

impl Default for WorkshopData {
    fn default() -> Self {
        let alternative_frames = Self::DEFAULT_TEMPLATES
            .iter()
            .zip(1u32..)
            .map(|(template, id)| AlternativeFrame::new(FrameId::new(id), *template))
            .collect();
        Self {
            interpretation: String::new(),
            evidence_against: EvidenceSlots::default(),
            evidence_for: EvidenceSlots::default(),
            alternative_frames,
            anchored_frame: None,
        }
    }
}
