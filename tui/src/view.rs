//! Front-end state that the flow store does not own: slider drafts, field
//! focus, menu selection, the journal overlay and the toast flash.

use std::time::Duration;

use reframe_engine::{EvidenceKind, FlowState, FrameId, Stage};
use reframe_types::ui::FlashEffect;
use reframe_types::{ReliefExercise, ToastId, WorkshopData};

const TOAST_FLASH: Duration = Duration::from_millis(250);

pub const RELIEF_MENU: [ReliefExercise; 2] =
    [ReliefExercise::PatternPuzzle, ReliefExercise::AudioBreathe];

/// One editable field of the perception workshop, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkshopField {
    Interpretation,
    Evidence(EvidenceKind, usize),
    Frame(FrameId),
}

impl WorkshopField {
    /// Current text of the field, if it still exists.
    #[must_use]
    pub fn text(self, workshop: &WorkshopData) -> Option<&str> {
        match self {
            WorkshopField::Interpretation => Some(workshop.interpretation.as_str()),
            WorkshopField::Evidence(kind, index) => workshop.evidence(kind).get(index),
            WorkshopField::Frame(id) => workshop
                .alternative_frames
                .iter()
                .find(|frame| frame.id() == id)
                .map(|frame| frame.completion.as_str()),
        }
    }
}

#[must_use]
pub fn workshop_fields(workshop: &WorkshopData) -> Vec<WorkshopField> {
    let mut fields = vec![WorkshopField::Interpretation];
    for kind in [EvidenceKind::Against, EvidenceKind::For] {
        fields.extend((0..workshop.evidence(kind).len()).map(|i| WorkshopField::Evidence(kind, i)));
    }
    fields.extend(
        workshop
            .alternative_frames
            .iter()
            .map(|frame| WorkshopField::Frame(frame.id())),
    );
    fields
}

#[derive(Debug)]
pub struct ViewState {
    willingness_draft: i64,
    workshop_focus: usize,
    clarity_draft: String,
    relief_selection: usize,
    journal_open: bool,
    stage: Stage,
    seen_toast: ToastId,
    flash: Option<FlashEffect>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            willingness_draft: 50,
            workshop_focus: 0,
            clarity_draft: String::new(),
            relief_selection: 0,
            journal_open: false,
            stage: Stage::default(),
            seen_toast: ToastId::default(),
            flash: None,
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn new(state: &FlowState) -> Self {
        Self {
            willingness_draft: i64::from(state.willingness_score.value()),
            stage: state.current_stage,
            ..Self::default()
        }
    }

    /// Follow the store after a frame: reset per-stage drafts on stage change
    /// and start a flash when a new toast appears.
    pub fn sync(&mut self, state: &FlowState, delta: Duration) {
        if state.current_stage != self.stage {
            self.enter_stage(state);
        }

        if let Some(flash) = self.flash.as_mut() {
            flash.advance(delta);
            if !flash.is_active() {
                self.flash = None;
            }
        }
        if state.toast.visible && state.toast.id != self.seen_toast {
            self.seen_toast = state.toast.id;
            self.flash = Some(FlashEffect::new(TOAST_FLASH));
        }
    }

    fn enter_stage(&mut self, state: &FlowState) {
        self.stage = state.current_stage;
        match state.current_stage {
            Stage::WillingnessCalibration => {
                self.willingness_draft = i64::from(state.willingness_score.value());
            }
            Stage::PerceptionWorkshop => self.workshop_focus = 0,
            Stage::ClarityReflection => self.clarity_draft.clear(),
            Stage::ImmediateReliefPractice => self.relief_selection = 0,
            Stage::OpennessPrimer | Stage::ReinforcementBecoming => {}
        }
    }

    // ------------------------------------------------------------------------
    // Willingness
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn willingness_draft(&self) -> i64 {
        self.willingness_draft
    }

    pub fn nudge_willingness(&mut self, delta: i64) {
        self.willingness_draft = (self.willingness_draft + delta).clamp(0, 100);
    }

    // ------------------------------------------------------------------------
    // Workshop
    // ------------------------------------------------------------------------

    /// Focused field, clamped to the fields that currently exist.
    #[must_use]
    pub fn workshop_focus(&self, workshop: &WorkshopData) -> WorkshopField {
        let fields = workshop_fields(workshop);
        let index = self.workshop_focus.min(fields.len().saturating_sub(1));
        fields
            .get(index)
            .copied()
            .unwrap_or(WorkshopField::Interpretation)
    }

    pub fn focus_next_field(&mut self, workshop: &WorkshopData) {
        let count = workshop_fields(workshop).len();
        self.workshop_focus = (self.workshop_focus.min(count - 1) + 1) % count;
    }

    pub fn focus_prev_field(&mut self, workshop: &WorkshopData) {
        let count = workshop_fields(workshop).len();
        let current = self.workshop_focus.min(count - 1);
        self.workshop_focus = (current + count - 1) % count;
    }

    pub fn focus_field(&mut self, workshop: &WorkshopData, field: WorkshopField) {
        if let Some(index) = workshop_fields(workshop).iter().position(|f| *f == field) {
            self.workshop_focus = index;
        }
    }

    // ------------------------------------------------------------------------
    // Clarity
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn clarity_draft(&self) -> &str {
        &self.clarity_draft
    }

    pub fn clarity_draft_mut(&mut self) -> &mut String {
        &mut self.clarity_draft
    }

    // ------------------------------------------------------------------------
    // Relief menu
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn relief_selection(&self) -> ReliefExercise {
        RELIEF_MENU[self.relief_selection % RELIEF_MENU.len()]
    }

    #[must_use]
    pub fn relief_selection_index(&self) -> usize {
        self.relief_selection % RELIEF_MENU.len()
    }

    pub fn move_relief_selection(&mut self, forward: bool) {
        let len = RELIEF_MENU.len();
        self.relief_selection = if forward {
            (self.relief_selection + 1) % len
        } else {
            (self.relief_selection + len - 1) % len
        };
    }

    // ------------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn is_journal_open(&self) -> bool {
        self.journal_open
    }

    pub fn toggle_journal(&mut self) {
        self.journal_open = !self.journal_open;
    }

    pub fn close_journal(&mut self) {
        self.journal_open = false;
    }

    #[must_use]
    pub fn toast_flash(&self) -> Option<&FlashEffect> {
        self.flash.as_ref()
    }
}
