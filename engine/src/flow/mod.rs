//! Stage orchestrator.
//!
//! [`FlowStore`] is the single authority over the flow: which stage is
//! active, primer attempts, workshop data, the journal and the transient
//! toast. Every operation applies completely before returning.
//!
//! Toast auto-hide runs on the store's own [`Timeline`]. A scheduled hide
//! only takes effect if its toast is still the current one, so a newer toast
//! is never hidden by an older toast's timer.

mod state;

use std::time::Duration;

use reframe_core::{RandomSource, Timeline, pick};
use reframe_types::settings::ToastSettings;
use reframe_types::{
    AlternativeFrame, AnchoredFrame, AudioClip, ClarityReflection, EvidenceKind, FrameId,
    JournalEntryId, NonEmptyString, PrimerAttempt, PrimerExercise, Rating, ReliefExercise,
    ReliefSubStage, Stage, Theme, Toast, ToastId, ToastKind, WillingnessBand, WillingnessScore,
};

pub use state::FlowState;

/// Shown when the user is not ready to continue.
pub const NOT_READY_MESSAGE: &str = "Openness requires curiosity. Return when you're ready, or explore our Intro Guide for foundational practices.";

pub const AFFIRMATIONS: [&str; 3] = [
    "You are not wrong, you are becoming.",
    "This moment is the perfect launching pad.",
    "Relief is always available.",
];

/// Failed primer attempts allowed before the flow exits.
pub const MAX_PRIMER_ATTEMPTS: u32 = 2;

pub const PRIMER_SUCCESS_TOAST: &str = "Alignment achieved!";
pub const ANCHOR_SUCCESS_TOAST: &str = "Frame anchored to journal!";
pub const ANCHOR_FAILURE_TOAST: &str = "Please complete and rate at least one frame to anchor.";
pub const RELIEF_SUCCESS_TOAST: &str = "Relief achieved!";
pub const CLARITY_REQUIRED_TOAST: &str = "Please provide your reflection or record an audio note.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    #[error("no alternative frame has been completed")]
    NothingCompleted,
}

pub struct FlowStore {
    state: FlowState,
    rng: Box<dyn RandomSource>,
    toast_timers: Timeline<ToastId>,
    toast_settings: ToastSettings,
    last_toast_id: ToastId,
    /// Set when `journal` or `theme` changed since the last save.
    persist_pending: bool,
}

impl std::fmt::Debug for FlowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowStore")
            .field("state", &self.state)
            .field("last_toast_id", &self.last_toast_id)
            .field("persist_pending", &self.persist_pending)
            .finish_non_exhaustive()
    }
}

impl FlowStore {
    #[must_use]
    pub fn new(rng: Box<dyn RandomSource>, toast_settings: ToastSettings) -> Self {
        Self {
            state: FlowState::default(),
            rng,
            toast_timers: Timeline::new(),
            toast_settings,
            last_toast_id: ToastId::default(),
            persist_pending: false,
        }
    }

    /// Bring back a saved journal and theme without marking them dirty.
    pub fn restore(&mut self, journal: Vec<AnchoredFrame>, theme: Theme) {
        tracing::debug!(entries = journal.len(), ?theme, "Restoring saved session");
        self.state.journal = journal;
        self.state.theme = theme;
    }

    #[must_use]
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> FlowState {
        self.state.clone()
    }

    /// The store's random source, shared with the exercise generators.
    pub fn random(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// True once per change to persisted fields.
    pub fn take_persist_request(&mut self) -> bool {
        std::mem::take(&mut self.persist_pending)
    }

    /// Run due toast timers.
    pub fn advance(&mut self, delta: Duration) {
        let until = self.toast_timers.now().saturating_add(delta);
        while let Some((_, id)) = self.toast_timers.pop_due(until) {
            if self.state.toast.id == id && self.state.toast.visible {
                self.state.toast.visible = false;
            }
        }
        self.toast_timers.settle(until);
    }

    fn enter_stage(&mut self, stage: Stage) {
        if self.state.current_stage != stage {
            tracing::info!(from = ?self.state.current_stage, to = ?stage, "Stage transition");
        }
        self.state.current_stage = stage;
    }

    // ------------------------------------------------------------------------
    // Willingness and primer
    // ------------------------------------------------------------------------

    /// Record a score (clamped to `0..=100`) and route on it.
    pub fn set_willingness_score(&mut self, score: i64) {
        let score = WillingnessScore::clamped(score);
        self.state.willingness_score = score;
        match score.band() {
            WillingnessBand::NotReady => {
                self.state.exit_message = Some(NOT_READY_MESSAGE.to_string());
                self.prepare_reinforcement();
            }
            WillingnessBand::Moderate => {
                self.state.openness_primer_attempts = 0;
                self.state.openness_primer_exercise = PrimerExercise::PatternPuzzle;
                self.state.exit_message = None;
                self.enter_stage(Stage::OpennessPrimer);
            }
            WillingnessBand::Ready => {
                self.state.exit_message = None;
                self.enter_stage(Stage::PerceptionWorkshop);
            }
        }
    }

    pub fn fail_openness_primer_attempt(&mut self) -> PrimerAttempt {
        self.state.openness_primer_attempts += 1;
        if self.state.openness_primer_attempts >= MAX_PRIMER_ATTEMPTS {
            tracing::info!("Primer attempts exhausted");
            self.state.exit_message = Some(NOT_READY_MESSAGE.to_string());
            self.prepare_reinforcement();
            return PrimerAttempt::Exiting;
        }
        self.state.openness_primer_exercise = match self.state.openness_primer_exercise {
            PrimerExercise::PatternPuzzle => PrimerExercise::SequenceTap,
            PrimerExercise::SequenceTap => PrimerExercise::PatternPuzzle,
        };
        tracing::debug!(
            attempts = self.state.openness_primer_attempts,
            exercise = ?self.state.openness_primer_exercise,
            "Primer retry"
        );
        PrimerAttempt::Retry
    }

    pub fn succeed_openness_primer(&mut self) {
        self.state.openness_primer_attempts = 0;
        self.state.exit_message = None;
        self.enter_stage(Stage::PerceptionWorkshop);
        self.show_toast(PRIMER_SUCCESS_TOAST, ToastKind::Success, None);
    }

    /// Attempts left before the primer exits the flow.
    #[must_use]
    pub fn remaining_primer_attempts(&self) -> u32 {
        MAX_PRIMER_ATTEMPTS.saturating_sub(self.state.openness_primer_attempts)
    }

    // ------------------------------------------------------------------------
    // Workshop
    // ------------------------------------------------------------------------

    pub fn update_interpretation(&mut self, text: impl Into<String>) {
        self.state.workshop.interpretation = text.into();
    }

    /// Out-of-range indices are ignored.
    pub fn update_evidence(&mut self, kind: EvidenceKind, index: usize, text: impl Into<String>) {
        if !self.state.workshop.evidence_mut(kind).set(index, text) {
            tracing::debug!(?kind, index, "Ignoring evidence update outside slots");
        }
    }

    pub fn add_evidence_slot(&mut self, kind: EvidenceKind) {
        self.state.workshop.evidence_mut(kind).push_slot();
    }

    pub fn remove_evidence_slot(&mut self, kind: EvidenceKind, index: usize) {
        self.state.workshop.evidence_mut(kind).remove_slot(index);
    }

    pub fn update_frame_completion(&mut self, id: FrameId, text: impl Into<String>) {
        if let Some(frame) = self.state.workshop.frame_mut(id) {
            frame.completion = text.into();
        }
    }

    /// Rating is clamped to `0..=5`.
    pub fn update_frame_rating(&mut self, id: FrameId, rating: i64) {
        if let Some(frame) = self.state.workshop.frame_mut(id) {
            frame.rating = Rating::clamped(rating);
        }
    }

    /// Append a frame with the next free id.
    pub fn add_alternative_frame(&mut self, template: impl Into<String>) -> FrameId {
        let next = self
            .state
            .workshop
            .alternative_frames
            .iter()
            .map(|frame| frame.id().value())
            .max()
            .unwrap_or(0)
            + 1;
        let id = FrameId::new(next);
        self.state
            .workshop
            .alternative_frames
            .push(AlternativeFrame::new(id, template));
        id
    }

    /// Anchor the highest-rated completed frame and append it to the journal.
    pub fn commit_and_anchor_frame(&mut self) -> Result<&AnchoredFrame, AnchorError> {
        let Some(best) = self.state.workshop.best_completed_frame() else {
            self.show_toast(ANCHOR_FAILURE_TOAST, ToastKind::Warning, None);
            return Err(AnchorError::NothingCompleted);
        };

        let anchored = AnchoredFrame {
            id: JournalEntryId::generate(),
            statement: best.template().to_string(),
            completion: best.completion.clone(),
            full_text: best.full_text(),
            rating: best.rating,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        tracing::info!(frame = %best.id(), rating = best.rating.value(), "Frame anchored");

        self.state.journal.push(anchored.clone());
        self.persist_pending = true;
        self.show_toast(ANCHOR_SUCCESS_TOAST, ToastKind::Success, None);
        Ok(self.state.workshop.anchored_frame.insert(anchored))
    }

    pub fn proceed_from_workshop(&mut self) {
        self.enter_stage(Stage::ClarityReflection);
    }

    // ------------------------------------------------------------------------
    // Clarity
    // ------------------------------------------------------------------------

    /// Blank text clears the reflection.
    pub fn set_clarity_text(&mut self, text: impl Into<String>) {
        self.state.clarity = match NonEmptyString::new(text) {
            Ok(text) => ClarityReflection::Text(text),
            Err(_) => ClarityReflection::Empty,
        };
    }

    pub fn set_clarity_audio(&mut self, clip: AudioClip) {
        self.state.clarity = ClarityReflection::Audio(clip);
    }

    pub fn clear_clarity_reflection(&mut self) {
        self.state.clarity = ClarityReflection::Empty;
    }

    pub fn proceed_from_clarity(&mut self) {
        self.state.relief_sub_stage = ReliefSubStage::Menu;
        self.enter_stage(Stage::ImmediateReliefPractice);
    }

    // ------------------------------------------------------------------------
    // Immediate relief
    // ------------------------------------------------------------------------

    pub fn start_immediate_relief_exercise(&mut self, kind: ReliefExercise) {
        tracing::debug!(?kind, "Relief exercise started");
        self.state.relief_sub_stage = kind.sub_stage();
    }

    pub fn complete_immediate_relief_exercise(&mut self) {
        self.show_toast(RELIEF_SUCCESS_TOAST, ToastKind::Success, None);
        self.prepare_reinforcement();
    }

    pub fn return_to_relief_menu(&mut self) {
        self.state.relief_sub_stage = ReliefSubStage::Menu;
    }

    pub fn skip_immediate_relief_puzzle(&mut self) {
        self.state.relief_sub_stage = ReliefSubStage::Menu;
    }

    // ------------------------------------------------------------------------
    // Reinforcement and reset
    // ------------------------------------------------------------------------

    pub(crate) fn prepare_reinforcement(&mut self) {
        self.state.final_reinforcement_message =
            pick(self.rng.as_mut(), &AFFIRMATIONS).map(|message| (*message).to_string());
        self.enter_stage(Stage::ReinforcementBecoming);
    }

    /// Back to the start. The journal and theme are kept.
    pub fn finish_module_and_reset(&mut self) {
        let journal = std::mem::take(&mut self.state.journal);
        self.state = FlowState::with_persisted(journal, self.state.theme);
        self.toast_timers.clear();
        tracing::info!("Module reset");
    }

    pub fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
        self.persist_pending = true;
    }

    // ------------------------------------------------------------------------
    // Toasts
    // ------------------------------------------------------------------------

    /// Replace the current toast. `None` uses the configured duration.
    pub fn show_toast(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Option<Duration>,
    ) -> ToastId {
        self.last_toast_id = self.last_toast_id.next();
        let id = self.last_toast_id;
        self.state.toast = Toast {
            id,
            message: message.into(),
            kind,
            visible: true,
        };
        let duration = duration.unwrap_or_else(|| self.toast_settings.duration());
        self.toast_timers.schedule(duration, id);
        id
    }

    pub fn hide_toast(&mut self) {
        self.state.toast.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AFFIRMATIONS, ANCHOR_FAILURE_TOAST, AnchorError, FlowState, FlowStore, NOT_READY_MESSAGE,
    };
    use reframe_core::{SequenceRandom, ThreadRandom};
    use reframe_types::settings::ToastSettings;
    use reframe_types::{
        AudioClip, ClarityReflection, EvidenceKind, FrameId, PrimerAttempt, PrimerExercise,
        ReliefExercise, ReliefSubStage, Stage, Theme, ToastKind,
    };
    use std::time::Duration;

    fn store() -> FlowStore {
        FlowStore::new(Box::new(ThreadRandom), ToastSettings::default())
    }

    fn seeded(values: Vec<usize>) -> FlowStore {
        FlowStore::new(Box::new(SequenceRandom::new(values)), ToastSettings::default())
    }

    #[test]
    fn willingness_routes_on_hard_thresholds() {
        for score in [-5, 0, 49, 50, 69, 70, 100, 250] {
            let mut store = store();
            store.set_willingness_score(score);
            let expected = if score < 50 {
                Stage::ReinforcementBecoming
            } else if score < 70 {
                Stage::OpennessPrimer
            } else {
                Stage::PerceptionWorkshop
            };
            assert_eq!(store.state().current_stage, expected, "score {score}");
        }
    }

    #[test]
    fn willingness_is_clamped_and_reevaluated() {
        let mut store = store();
        store.set_willingness_score(-10);
        assert_eq!(store.state().willingness_score.value(), 0);
        assert_eq!(store.state().exit_message.as_deref(), Some(NOT_READY_MESSAGE));
        assert!(
            AFFIRMATIONS
                .iter()
                .any(|a| store.state().final_reinforcement_message.as_deref() == Some(*a))
        );

        store.set_willingness_score(500);
        assert_eq!(store.state().willingness_score.value(), 100);
        assert_eq!(store.state().current_stage, Stage::PerceptionWorkshop);
        assert_eq!(store.state().exit_message, None);
    }

    #[test]
    fn moderate_score_resets_primer() {
        let mut store = store();
        store.set_willingness_score(60);
        store.fail_openness_primer_attempt();
        store.set_willingness_score(55);
        assert_eq!(store.state().openness_primer_attempts, 0);
        assert_eq!(
            store.state().openness_primer_exercise,
            PrimerExercise::PatternPuzzle
        );
    }

    #[test]
    fn one_failure_toggles_exercise_and_stays() {
        let mut store = store();
        store.set_willingness_score(60);
        assert_eq!(store.fail_openness_primer_attempt(), PrimerAttempt::Retry);
        assert_eq!(store.state().current_stage, Stage::OpennessPrimer);
        assert_eq!(
            store.state().openness_primer_exercise,
            PrimerExercise::SequenceTap
        );
        assert_eq!(store.remaining_primer_attempts(), 1);
    }

    #[test]
    fn two_failures_exit_to_reinforcement() {
        let mut store = store();
        store.set_willingness_score(60);
        store.fail_openness_primer_attempt();
        assert_eq!(store.fail_openness_primer_attempt(), PrimerAttempt::Exiting);
        assert_eq!(store.state().current_stage, Stage::ReinforcementBecoming);
        assert_eq!(store.state().exit_message.as_deref(), Some(NOT_READY_MESSAGE));
        assert_eq!(store.remaining_primer_attempts(), 0);
    }

    #[test]
    fn primer_success_moves_to_workshop_with_toast() {
        let mut store = store();
        store.set_willingness_score(60);
        store.fail_openness_primer_attempt();
        store.succeed_openness_primer();
        let state = store.state();
        assert_eq!(state.current_stage, Stage::PerceptionWorkshop);
        assert_eq!(state.openness_primer_attempts, 0);
        assert_eq!(state.toast.message, "Alignment achieved!");
        assert_eq!(state.toast.kind, ToastKind::Success);
        assert!(state.toast.visible);
    }

    #[test]
    fn anchoring_nothing_completed_changes_nothing() {
        let mut store = store();
        store.update_frame_rating(FrameId::new(1), 5);
        let before = store.snapshot();
        assert_eq!(
            store.commit_and_anchor_frame().unwrap_err(),
            AnchorError::NothingCompleted
        );
        let after = store.state();
        assert_eq!(after.workshop, before.workshop);
        assert_eq!(after.journal, before.journal);
        assert_eq!(after.toast.message, ANCHOR_FAILURE_TOAST);
        assert_eq!(after.toast.kind, ToastKind::Warning);
        assert!(!store.take_persist_request());
    }

    #[test]
    fn anchoring_picks_highest_rated_completed_frame() {
        let mut store = store();
        let fourth = store.add_alternative_frame("I am learning that…");
        let ids = [FrameId::new(1), FrameId::new(2), FrameId::new(3), fourth];
        for (id, rating) in ids.iter().zip([0, 3, 5, 2]) {
            store.update_frame_rating(*id, rating);
        }
        for id in &ids[1..] {
            store.update_frame_completion(*id, format!("completion {id}"));
        }

        let anchored = store.commit_and_anchor_frame().unwrap().clone();
        assert_eq!(anchored.statement, "This experience confirms that I…");
        assert_eq!(anchored.completion, "completion 3");
        assert_eq!(
            anchored.full_text,
            "This experience confirms that I completion 3"
        );
        assert_eq!(anchored.rating.value(), 5);
        assert!(chrono::DateTime::parse_from_rfc3339(&anchored.timestamp).is_ok());

        let state = store.state();
        assert_eq!(state.journal, vec![anchored.clone()]);
        assert_eq!(state.workshop.anchored_frame, Some(anchored));
        assert!(store.take_persist_request());
        assert!(!store.take_persist_request());
    }

    #[test]
    fn anchoring_tie_goes_to_first_frame() {
        let mut store = store();
        for id in [1, 2] {
            store.update_frame_completion(FrameId::new(id), "same");
            store.update_frame_rating(FrameId::new(id), 4);
        }
        let anchored = store.commit_and_anchor_frame().unwrap();
        assert_eq!(anchored.statement, "This is temporary because…");
    }

    #[test]
    fn reanchoring_appends_and_keeps_earlier_entries() {
        let mut store = store();
        store.update_frame_completion(FrameId::new(1), "a");
        store.update_frame_rating(FrameId::new(1), 3);
        let first = store.commit_and_anchor_frame().unwrap().clone();

        store.update_frame_completion(FrameId::new(1), "b");
        store.update_frame_rating(FrameId::new(1), 5);
        let second = store.commit_and_anchor_frame().unwrap().clone();
        assert_ne!(first.id, second.id);

        let state = store.state();
        assert_eq!(state.journal.len(), 2);
        assert_eq!(state.journal[0], first);
        assert_eq!(state.journal[0].completion, "a");
        assert_eq!(state.journal[0].rating.value(), 3);
        assert_eq!(state.journal[1].completion, "b");
        assert_eq!(state.journal[1].rating.value(), 5);
        assert_eq!(state.workshop.anchored_frame.as_ref(), Some(&state.journal[1]));
    }

    #[test]
    fn rating_is_clamped() {
        let mut store = store();
        store.update_frame_rating(FrameId::new(2), 9);
        store.update_frame_rating(FrameId::new(3), -1);
        let frames = &store.state().workshop.alternative_frames;
        assert_eq!(frames[1].rating.value(), 5);
        assert_eq!(frames[2].rating.value(), 0);
    }

    #[test]
    fn evidence_slots_stay_between_two_and_three() {
        let mut store = store();
        let ops: [(bool, usize); 10] = [
            (true, 0),
            (true, 0),
            (true, 0),
            (false, 0),
            (false, 0),
            (false, 1),
            (false, 7),
            (true, 0),
            (false, 2),
            (false, 0),
        ];
        for (add, index) in ops {
            if add {
                store.add_evidence_slot(EvidenceKind::For);
            } else {
                store.remove_evidence_slot(EvidenceKind::For, index);
            }
            let len = store.state().workshop.evidence_for.len();
            assert!((2..=3).contains(&len), "len {len}");
        }
    }

    #[test]
    fn evidence_update_out_of_range_is_ignored() {
        let mut store = store();
        store.update_evidence(EvidenceKind::Against, 1, "it worked before");
        store.update_evidence(EvidenceKind::Against, 5, "ignored");
        let slots = &store.state().workshop.evidence_against;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.get(1), Some("it worked before"));
    }

    #[test]
    fn forward_path_through_relief() {
        let mut store = store();
        store.set_willingness_score(80);
        store.update_interpretation("A setback");
        store.proceed_from_workshop();
        assert_eq!(store.state().current_stage, Stage::ClarityReflection);
        store.set_clarity_text("I see it differently now");
        store.proceed_from_clarity();
        assert_eq!(store.state().current_stage, Stage::ImmediateReliefPractice);
        assert_eq!(store.state().relief_sub_stage, ReliefSubStage::Menu);

        store.start_immediate_relief_exercise(ReliefExercise::AudioBreathe);
        assert_eq!(
            store.state().relief_sub_stage,
            ReliefSubStage::AudioBreatheRelief
        );
        store.return_to_relief_menu();
        store.start_immediate_relief_exercise(ReliefExercise::PatternPuzzle);
        store.skip_immediate_relief_puzzle();
        assert_eq!(store.state().relief_sub_stage, ReliefSubStage::Menu);

        store.complete_immediate_relief_exercise();
        assert_eq!(store.state().current_stage, Stage::ReinforcementBecoming);
        assert_eq!(store.state().toast.message, "Relief achieved!");
    }

    #[test]
    fn reinforcement_message_uses_injected_source() {
        let mut store = seeded(vec![2]);
        store.complete_immediate_relief_exercise();
        assert_eq!(
            store.state().final_reinforcement_message.as_deref(),
            Some(AFFIRMATIONS[2])
        );
    }

    #[test]
    fn clarity_reflection_variants() {
        let mut store = store();
        store.set_clarity_text("   ");
        assert!(store.state().clarity.is_empty());
        store.set_clarity_text("noted");
        assert!(matches!(store.state().clarity, ClarityReflection::Text(_)));
        store.set_clarity_audio(AudioClip {
            bytes: vec![1, 2, 3],
            mime_type: "audio/wav".to_string(),
            duration: Duration::from_secs(2),
        });
        assert!(matches!(store.state().clarity, ClarityReflection::Audio(_)));
        store.clear_clarity_reflection();
        assert!(store.state().clarity.is_empty());
    }

    #[test]
    fn reset_restores_defaults_but_keeps_journal_and_theme() {
        let mut store = store();
        store.set_willingness_score(80);
        store.update_interpretation("x");
        store.add_evidence_slot(EvidenceKind::Against);
        store.update_frame_completion(FrameId::new(1), "it passes");
        store.update_frame_rating(FrameId::new(1), 4);
        store.commit_and_anchor_frame().unwrap();
        store.proceed_from_workshop();
        store.set_clarity_text("clear");
        store.proceed_from_clarity();
        store.start_immediate_relief_exercise(ReliefExercise::AudioBreathe);
        store.toggle_theme();
        store.complete_immediate_relief_exercise();

        let journal = store.state().journal.clone();
        let theme = store.state().theme;
        assert_eq!(journal.len(), 1);
        assert_eq!(theme, Theme::Light);

        store.finish_module_and_reset();
        assert_eq!(store.snapshot(), FlowState::with_persisted(journal, theme));
    }

    #[test]
    fn newer_toast_survives_older_timer() {
        let mut store = store();
        let a = store.show_toast("A", ToastKind::Info, None);
        store.advance(Duration::from_millis(1000));
        let b = store.show_toast("B", ToastKind::Info, None);
        assert_ne!(a, b);

        store.advance(Duration::from_millis(2500));
        let toast = &store.state().toast;
        assert_eq!(toast.message, "B");
        assert!(toast.visible);

        store.advance(Duration::from_millis(500));
        assert!(!store.state().toast.visible);
    }

    #[test]
    fn toast_custom_duration_and_manual_hide() {
        let mut store = store();
        store.show_toast("quick", ToastKind::Success, Some(Duration::from_millis(800)));
        store.advance(Duration::from_millis(799));
        assert!(store.state().toast.visible);
        store.advance(Duration::from_millis(1));
        assert!(!store.state().toast.visible);

        store.show_toast("manual", ToastKind::Error, None);
        store.hide_toast();
        assert!(!store.state().toast.visible);
    }

    #[test]
    fn toast_ids_stay_unique_across_reset() {
        let mut store = store();
        let first = store.show_toast("one", ToastKind::Info, None);
        store.finish_module_and_reset();
        let second = store.show_toast("two", ToastKind::Info, None);
        assert!(second > first);
    }

    #[test]
    fn restore_does_not_request_persist() {
        let mut store = store();
        store.restore(Vec::new(), Theme::Light);
        assert_eq!(store.state().theme, Theme::Light);
        assert!(!store.take_persist_request());
        store.toggle_theme();
        assert!(store.take_persist_request());
        assert_eq!(store.state().theme, Theme::Dark);
    }
}
