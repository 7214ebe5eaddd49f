//! Breath-cue cadence controller.
//!
//! Cycles inhale, hold, exhale, rest for the configured total. Each phase
//! shows its cue word, speaks it unless chime-only (or speech is
//! unsupported), and plays the phase tone. A one-second tick keeps the
//! remaining-time counter current. When the total runs out the controller
//! announces completion and reports success 1.5 s later.

use std::sync::Arc;
use std::time::Duration;

use reframe_core::Timeline;
use reframe_types::settings::{BreathSettings, CueVoice};

use super::{ExerciseEvent, ExerciseOutcome, Outbox};
use crate::ports::{AudioReady, SpeechPort, TonePort};

const TICK: Duration = Duration::from_secs(1);
const COMPLETION_DELAY: Duration = Duration::from_millis(1500);

pub const PROMPT_READY: &str = "Press Enter to begin";
pub const PROMPT_PAUSED: &str = "Paused";
pub const PROMPT_COMPLETE: &str = "Session complete. Well done.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathPhase {
    Idle,
    Inhaling,
    Holding,
    Exhaling,
    Resting,
}

impl BreathPhase {
    #[must_use]
    pub fn cue(self) -> Option<&'static str> {
        match self {
            BreathPhase::Idle => None,
            BreathPhase::Inhaling => Some("Breathe in"),
            BreathPhase::Holding => Some("Hold"),
            BreathPhase::Exhaling => Some("Breathe out"),
            BreathPhase::Resting => Some("Rest"),
        }
    }

    fn slot(self) -> Option<usize> {
        match self {
            BreathPhase::Idle => None,
            BreathPhase::Inhaling => Some(0),
            BreathPhase::Holding => Some(1),
            BreathPhase::Exhaling => Some(2),
            BreathPhase::Resting => Some(3),
        }
    }

    fn next(self) -> Self {
        match self {
            BreathPhase::Idle | BreathPhase::Resting => BreathPhase::Inhaling,
            BreathPhase::Inhaling => BreathPhase::Holding,
            BreathPhase::Holding => BreathPhase::Exhaling,
            BreathPhase::Exhaling => BreathPhase::Resting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreathTimer {
    PhaseEnd,
    Tick,
    Complete,
}

pub struct BreathCue {
    settings: BreathSettings,
    voice: CueVoice,
    tone: Arc<dyn TonePort>,
    speech: Arc<dyn SpeechPort>,
    timeline: Timeline<BreathTimer>,
    phase: BreathPhase,
    prompt: &'static str,
    remaining: Duration,
    /// Timeline instant at which the run's total elapses.
    ends_at: Duration,
    cancelled: bool,
    completing: bool,
    outbox: Outbox,
}

impl std::fmt::Debug for BreathCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreathCue")
            .field("phase", &self.phase)
            .field("remaining", &self.remaining)
            .field("cancelled", &self.cancelled)
            .field("completing", &self.completing)
            .finish_non_exhaustive()
    }
}

impl BreathCue {
    #[must_use]
    pub fn new(
        settings: BreathSettings,
        tone: Arc<dyn TonePort>,
        speech: Arc<dyn SpeechPort>,
    ) -> Self {
        Self {
            voice: settings.voice(),
            remaining: settings.total(),
            settings,
            tone,
            speech,
            timeline: Timeline::new(),
            phase: BreathPhase::Idle,
            prompt: PROMPT_READY,
            ends_at: Duration::ZERO,
            cancelled: false,
            completing: false,
            outbox: Outbox::default(),
        }
    }

    /// Begin or resume cycling from inhale. A paused run keeps its remaining
    /// time; a finished run cannot restart.
    pub fn start(&mut self, _ready: AudioReady) -> bool {
        if self.outbox.is_concluded() || self.completing || self.is_running() {
            return false;
        }
        if self.remaining.is_zero() {
            self.remaining = self.settings.total();
        }
        self.cancelled = false;
        self.timeline.clear();
        self.ends_at = self.timeline.now().saturating_add(self.remaining);
        tracing::debug!(remaining = ?self.remaining, "Breath cue started");
        self.enter_phase(BreathPhase::Inhaling);
        self.timeline.schedule(TICK, BreathTimer::Tick);
        true
    }

    /// Cancel every pending timer and any utterance, show the paused prompt,
    /// and optionally report a return to the menu.
    pub fn stop(&mut self, return_to_menu: bool) {
        let was_active = self.is_running() || self.completing;
        self.teardown();
        if was_active {
            self.prompt = PROMPT_PAUSED;
        }
        if return_to_menu {
            self.outbox.conclude(ExerciseOutcome::ReturnToMenu);
        }
    }

    fn teardown(&mut self) {
        if self.is_running() {
            self.remaining = self.ends_at.saturating_sub(self.timeline.now());
        }
        self.cancelled = true;
        self.completing = false;
        self.timeline.clear();
        self.speech.cancel();
        self.phase = BreathPhase::Idle;
    }

    pub fn set_voice(&mut self, voice: CueVoice) {
        self.voice = voice;
    }

    pub fn toggle_chime_only(&mut self) {
        self.voice = match self.voice {
            CueVoice::Spoken => CueVoice::ChimeOnly,
            CueVoice::ChimeOnly => CueVoice::Spoken,
        };
    }

    pub fn advance(&mut self, delta: Duration) {
        let until = self.timeline.now().saturating_add(delta);
        while let Some((_, timer)) = self.timeline.pop_due(until) {
            self.on_timer(timer);
        }
        self.timeline.settle(until);
    }

    fn on_timer(&mut self, timer: BreathTimer) {
        if self.cancelled {
            return;
        }
        match timer {
            BreathTimer::PhaseEnd => {
                self.refresh_remaining();
                if self.remaining.is_zero() {
                    self.complete();
                } else {
                    self.enter_phase(self.phase.next());
                }
            }
            BreathTimer::Tick => {
                self.refresh_remaining();
                if self.remaining.is_zero() {
                    self.complete();
                } else {
                    self.timeline.schedule(TICK, BreathTimer::Tick);
                }
            }
            BreathTimer::Complete => {
                self.completing = false;
                self.outbox.conclude(ExerciseOutcome::Success);
            }
        }
    }

    fn refresh_remaining(&mut self) {
        self.remaining = self.ends_at.saturating_sub(self.timeline.now());
    }

    fn enter_phase(&mut self, phase: BreathPhase) {
        let (Some(cue), Some(slot)) = (phase.cue(), phase.slot()) else {
            return;
        };
        self.phase = phase;
        self.prompt = cue;
        if self.voice == CueVoice::Spoken && self.speech.is_supported() {
            self.speech.speak(cue);
        }
        self.tone.play_tone(slot);
        self.timeline
            .schedule(self.settings.phases()[slot], BreathTimer::PhaseEnd);
    }

    fn complete(&mut self) {
        if self.completing {
            return;
        }
        tracing::debug!("Breath cue complete");
        self.timeline.clear();
        self.completing = true;
        self.phase = BreathPhase::Idle;
        self.prompt = PROMPT_COMPLETE;
        if self.voice == CueVoice::Spoken && self.speech.is_supported() {
            self.speech.speak(PROMPT_COMPLETE);
        }
        self.timeline.schedule(COMPLETION_DELAY, BreathTimer::Complete);
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
    pub fn is_running(&self) -> bool {
        self.phase != BreathPhase::Idle && !self.cancelled
    }

    #[must_use]
    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    #[must_use]
    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    #[must_use]
    pub fn voice(&self) -> CueVoice {
        self.voice
    }

    /// Progress through the current phase in `0.0..=1.0`, for the pulse gauge.
    #[must_use]
    pub fn phase_progress(&self) -> f32 {
        let Some(slot) = self.phase.slot() else {
            return 0.0;
        };
        let total = self.settings.phases()[slot];
        match self.timeline.next_due_in() {
            Some(left) if !total.is_zero() => {
                let left = left.min(total);
                1.0 - left.as_secs_f32() / total.as_secs_f32()
            }
            _ => 0.0,
        }
    }
}

impl Drop for BreathCue {
    fn drop(&mut self) {
        if self.is_running() || self.completing {
            self.teardown();
        }
    }
}
