//! Sequence-memory-tap engine.
//!
//! Plays a random sequence of positions with tones and highlights, then
//! checks the user's taps against it. The first wrong tap fails the run.
//! A complete match succeeds.

use std::sync::Arc;
use std::time::Duration;

use reframe_core::{RandomSource, Timeline, TimerId, generate_sequence};
use reframe_types::ToastKind;
use reframe_types::settings::SequenceSettings;

use super::{ExerciseEvent, ExerciseOutcome, Outbox};
use crate::ports::{AudioReady, TonePort};

const LEAD_IN: Duration = Duration::from_millis(1500);
const TONE_HOLD: Duration = Duration::from_millis(300);
const STEP_PAUSE: Duration = Duration::from_millis(200);
const BETWEEN_STEPS: Duration = Duration::from_millis(100);
const TAP_FEEDBACK: Duration = Duration::from_millis(400);
const FAILURE_DELAY: Duration = Duration::from_millis(1500);
const SUCCESS_DELAY: Duration = Duration::from_millis(1000);

pub const MISMATCH_TOAST: &str = "Oops! That wasn't the right step.";
pub const SUCCESS_TOAST: &str = "Focus restored!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePhase {
    LeadIn,
    /// Lead-in finished but the tone port was not ready; waiting for a
    /// manual start.
    AwaitingStart,
    Playing,
    AwaitingInput,
    Succeeded,
    Failed,
}

impl SequencePhase {
    #[must_use]
    pub fn status(self) -> &'static str {
        match self {
            SequencePhase::LeadIn => "Watch the sequence carefully.",
            SequencePhase::AwaitingStart => "Press Enter to start the sequence and enable audio.",
            SequencePhase::Playing => "Memorize this sequence...",
            SequencePhase::AwaitingInput => "Your turn! Repeat the sequence.",
            SequencePhase::Succeeded => "Correct! Focus restored.",
            SequencePhase::Failed => "Incorrect sequence. Try again after reset.",
        }
    }

    #[must_use]
    pub fn is_concluded(self) -> bool {
        matches!(self, SequencePhase::Succeeded | SequencePhase::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResult {
    /// Not the user's turn, or the position does not exist.
    Ignored,
    Accepted,
    Mismatch,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceTimer {
    LeadInDone,
    ShowStep(usize),
    ClearStep(usize),
    FeedbackOff,
    Conclude(ExerciseOutcome),
}

pub struct SequenceTap {
    sequence: Vec<usize>,
    positions: usize,
    tone: Arc<dyn TonePort>,
    timeline: Timeline<SequenceTimer>,
    phase: SequencePhase,
    /// Position lit by playback.
    playback_highlight: Option<usize>,
    /// Position lit by the user's last tap.
    feedback: Option<usize>,
    feedback_timer: Option<TimerId>,
    flash_all: bool,
    entered: usize,
    focused: usize,
    cancelled: bool,
    outbox: Outbox,
}

impl std::fmt::Debug for SequenceTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceTap")
            .field("sequence", &self.sequence)
            .field("phase", &self.phase)
            .field("entered", &self.entered)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

impl SequenceTap {
    /// Generate a fresh sequence and begin the lead-in.
    pub fn new(
        settings: SequenceSettings,
        rng: &mut dyn RandomSource,
        tone: Arc<dyn TonePort>,
    ) -> Self {
        let sequence = generate_sequence(rng, settings.length(), settings.positions());
        Self::with_sequence(sequence, settings.positions(), tone)
    }

    /// Begin the lead-in for a known sequence. Entries outside `positions`
    /// can never be matched.
    #[must_use]
    pub fn with_sequence(sequence: Vec<usize>, positions: usize, tone: Arc<dyn TonePort>) -> Self {
        let mut timeline = Timeline::new();
        timeline.schedule(LEAD_IN, SequenceTimer::LeadInDone);
        tracing::debug!(len = sequence.len(), positions, "Sequence tap created");
        Self {
            sequence,
            positions,
            tone,
            timeline,
            phase: SequencePhase::LeadIn,
            playback_highlight: None,
            feedback: None,
            feedback_timer: None,
            flash_all: false,
            entered: 0,
            focused: 0,
            cancelled: false,
            outbox: Outbox::default(),
        }
    }

    /// Manual start after the lead-in stalled on a suspended tone port.
    pub fn start_playback(&mut self, _ready: AudioReady) -> bool {
        if self.cancelled || self.phase != SequencePhase::AwaitingStart {
            return false;
        }
        self.begin_playback();
        true
    }

    fn begin_playback(&mut self) {
        self.phase = SequencePhase::Playing;
        if self.sequence.is_empty() {
            self.phase = SequencePhase::AwaitingInput;
            return;
        }
        self.timeline.schedule(Duration::ZERO, SequenceTimer::ShowStep(0));
    }

    pub fn advance(&mut self, delta: Duration) {
        let until = self.timeline.now().saturating_add(delta);
        while let Some((_, timer)) = self.timeline.pop_due(until) {
            self.on_timer(timer);
        }
        self.timeline.settle(until);
    }

    fn on_timer(&mut self, timer: SequenceTimer) {
        if self.cancelled {
            return;
        }
        match timer {
            SequenceTimer::LeadInDone => {
                if AudioReady::observed(self.tone.as_ref()).is_some() {
                    self.begin_playback();
                } else {
                    tracing::debug!("Tone port not ready; awaiting manual start");
                    self.phase = SequencePhase::AwaitingStart;
                }
            }
            SequenceTimer::ShowStep(step) => {
                let Some(&position) = self.sequence.get(step) else {
                    return;
                };
                self.playback_highlight = Some(position);
                self.tone.play_tone(position);
                self.timeline
                    .schedule(TONE_HOLD + STEP_PAUSE, SequenceTimer::ClearStep(step));
            }
            SequenceTimer::ClearStep(step) => {
                self.playback_highlight = None;
                if step + 1 < self.sequence.len() {
                    self.timeline
                        .schedule(BETWEEN_STEPS, SequenceTimer::ShowStep(step + 1));
                } else {
                    self.phase = SequencePhase::AwaitingInput;
                }
            }
            SequenceTimer::FeedbackOff => {
                self.feedback = None;
                self.feedback_timer = None;
            }
            SequenceTimer::Conclude(outcome) => {
                self.outbox.conclude(outcome);
            }
        }
    }

    /// Check a tap against the next expected position.
    pub fn tap(&mut self, position: usize) -> TapResult {
        if self.cancelled || self.phase != SequencePhase::AwaitingInput || position >= self.positions
        {
            return TapResult::Ignored;
        }

        self.tone.play_tone(position);
        self.feedback = Some(position);
        if let Some(id) = self.feedback_timer.take() {
            self.timeline.cancel(id);
        }
        self.feedback_timer = Some(self.timeline.schedule(TAP_FEEDBACK, SequenceTimer::FeedbackOff));

        if self.sequence.get(self.entered) != Some(&position) {
            tracing::debug!(step = self.entered, position, "Sequence mismatch");
            self.phase = SequencePhase::Failed;
            self.outbox.toast(MISMATCH_TOAST, ToastKind::Error);
            self.timeline.schedule(
                FAILURE_DELAY,
                SequenceTimer::Conclude(ExerciseOutcome::Failure),
            );
            return TapResult::Mismatch;
        }

        self.entered += 1;
        if self.entered < self.sequence.len() {
            return TapResult::Accepted;
        }

        tracing::debug!("Sequence matched");
        self.phase = SequencePhase::Succeeded;
        self.flash_all = true;
        self.outbox.toast(SUCCESS_TOAST, ToastKind::Success);
        self.timeline.schedule(
            SUCCESS_DELAY,
            SequenceTimer::Conclude(ExerciseOutcome::Success),
        );
        TapResult::Completed
    }

    pub fn focus_next(&mut self) {
        if self.positions > 0 {
            self.focused = (self.focused + 1) % self.positions;
        }
    }

    pub fn focus_prev(&mut self) {
        if self.positions > 0 {
            self.focused = (self.focused + self.positions - 1) % self.positions;
        }
    }

    /// Same path as tapping the focused position directly.
    pub fn activate_focused(&mut self) -> TapResult {
        self.tap(self.focused)
    }

    /// Stop all pending work. No outcome is reported afterwards.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.timeline.clear();
        self.playback_highlight = None;
        self.feedback = None;
        self.feedback_timer = None;
    }

    pub fn take_events(&mut self) -> Vec<ExerciseEvent> {
        self.outbox.take()
    }

    /// Whether the outcome has been reported. A finished run never reports again.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.outbox.is_concluded()
    }

    #[must_use]
    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    #[must_use]
    pub fn status(&self) -> &'static str {
        self.phase.status()
    }

    #[must_use]
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    #[must_use]
    pub fn positions(&self) -> usize {
        self.positions
    }

    #[must_use]
    pub fn entered(&self) -> usize {
        self.entered
    }

    #[must_use]
    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Whether a position should render lit right now.
    #[must_use]
    pub fn is_lit(&self, position: usize) -> bool {
        self.flash_all
            || self.playback_highlight == Some(position)
            || self.feedback == Some(position)
    }
}

impl Drop for SequenceTap {
    fn drop(&mut self) {
        if !self.cancelled {
            self.cancel();
        }
    }
}
