//! Application glue between the flow store and the exercise engines.
//!
//! `App` owns the [`FlowStore`], the exercise that the current stage calls
//! for, and the capability ports. The front end calls operations on it, then
//! calls [`App::tick`] once per frame with the elapsed wall-clock time.
//! `tick` polls audio readiness, advances the active engine and the store's
//! toast timers, forwards engine events into the store, and saves the
//! session when the journal or theme changed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use reframe_config::ReframeConfig;
use reframe_core::{RandomSource, ThreadRandom, generate_pattern_puzzle};
use reframe_types::settings::CueVoice;
use reframe_types::ui::UiOptions;
use reframe_types::{
    PrimerAttempt, PrimerExercise, RecorderState, ReliefExercise, ReliefSubStage, Stage, ToastKind,
};
use tokio::task::JoinHandle;

use crate::exercises::{
    BreathCue, ExerciseEvent, ExerciseOutcome, PatternPuzzleRun, ReliefPuzzleRun, SequencePhase,
    SequenceTap,
};
use crate::flow::{CLARITY_REQUIRED_TOAST, FlowStore};
use crate::persistence::{self, SavedSession};
use crate::ports::{
    AudioReady, AudioUnavailable, RecorderPort, SilentSpeech, SpeechPort, TerminalTone, TonePort,
    UnsupportedRecorder, ensure_audio_ready,
};

pub const RECORDING_UNSUPPORTED_TOAST: &str =
    "Audio recording is not supported here. Please use text input.";

/// Capability ports shared with the engines.
#[derive(Clone)]
pub struct Ports {
    pub tone: Arc<dyn TonePort>,
    pub speech: Arc<dyn SpeechPort>,
    pub recorder: Arc<dyn RecorderPort>,
}

impl Ports {
    /// Terminal bell, no speech, no recording.
    #[must_use]
    pub fn terminal() -> Self {
        Self {
            tone: Arc::new(TerminalTone::new()),
            speech: Arc::new(SilentSpeech),
            recorder: Arc::new(UnsupportedRecorder),
        }
    }
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports")
            .field("tone_ready", &self.tone.is_ready())
            .field("speech_supported", &self.speech.is_supported())
            .field("recorder_supported", &self.recorder.is_supported())
            .finish()
    }
}

/// The exercise the current stage is running, if any.
#[derive(Debug, Default)]
pub enum ActiveExercise {
    #[default]
    None,
    PrimerPattern(PatternPuzzleRun),
    PrimerSequence(SequenceTap),
    ReliefPuzzles(ReliefPuzzleRun),
    Breath(BreathCue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExerciseSlot {
    None,
    PrimerPattern,
    PrimerSequence,
    ReliefPuzzles,
    Breath,
}

impl ActiveExercise {
    fn slot(&self) -> ExerciseSlot {
        match self {
            ActiveExercise::None => ExerciseSlot::None,
            ActiveExercise::PrimerPattern(_) => ExerciseSlot::PrimerPattern,
            ActiveExercise::PrimerSequence(_) => ExerciseSlot::PrimerSequence,
            ActiveExercise::ReliefPuzzles(_) => ExerciseSlot::ReliefPuzzles,
            ActiveExercise::Breath(_) => ExerciseSlot::Breath,
        }
    }

    fn advance(&mut self, delta: Duration) {
        match self {
            ActiveExercise::None => {}
            ActiveExercise::PrimerPattern(run) => run.advance(delta),
            ActiveExercise::PrimerSequence(tap) => tap.advance(delta),
            ActiveExercise::ReliefPuzzles(run) => run.advance(delta),
            ActiveExercise::Breath(cue) => cue.advance(delta),
        }
    }

    fn take_events(&mut self) -> Vec<ExerciseEvent> {
        match self {
            ActiveExercise::None => Vec::new(),
            ActiveExercise::PrimerPattern(run) => run.take_events(),
            ActiveExercise::PrimerSequence(tap) => tap.take_events(),
            ActiveExercise::ReliefPuzzles(run) => run.take_events(),
            ActiveExercise::Breath(cue) => cue.take_events(),
        }
    }

    /// A run that has reported its outcome and can do nothing further.
    fn has_finished(&self) -> bool {
        match self {
            ActiveExercise::None => false,
            ActiveExercise::PrimerPattern(run) => run.has_finished(),
            ActiveExercise::PrimerSequence(tap) => tap.has_finished(),
            ActiveExercise::ReliefPuzzles(run) => run.has_finished(),
            ActiveExercise::Breath(cue) => cue.has_finished(),
        }
    }

    fn cancel(&mut self) {
        match self {
            ActiveExercise::None => {}
            ActiveExercise::PrimerPattern(run) => run.cancel(),
            ActiveExercise::PrimerSequence(tap) => tap.cancel(),
            ActiveExercise::ReliefPuzzles(run) => run.cancel(),
            ActiveExercise::Breath(cue) => cue.stop(false),
        }
    }
}

/// Which engine is waiting on audio readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioRequest {
    Breath,
    Sequence,
}

#[derive(Debug)]
struct PendingAudio {
    request: AudioRequest,
    handle: JoinHandle<Result<AudioReady, AudioUnavailable>>,
}

pub struct App {
    flow: FlowStore,
    config: ReframeConfig,
    ports: Ports,
    exercise: ActiveExercise,
    pending_audio: Option<PendingAudio>,
    session_path: Option<PathBuf>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("flow", &self.flow)
            .field("exercise", &self.exercise)
            .field("audio_pending", &self.pending_audio.is_some())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Production wiring: terminal ports, thread randomness, and the saved
    /// session from `~/.reframe`.
    #[must_use]
    pub fn new(config: ReframeConfig) -> Self {
        Self::with_parts(
            config,
            Ports::terminal(),
            Box::new(ThreadRandom),
            persistence::session_path(),
        )
    }

    /// Build an app from explicit parts. A saved session at `session_path`
    /// is loaded; load failures are logged and the app starts fresh.
    #[must_use]
    pub fn with_parts(
        config: ReframeConfig,
        ports: Ports,
        rng: Box<dyn RandomSource>,
        session_path: Option<PathBuf>,
    ) -> Self {
        let mut flow = FlowStore::new(rng, config.toast);

        let saved = session_path
            .as_deref()
            .and_then(|path| match persistence::load_session(path) {
                Ok(saved) => saved,
                Err(e) => {
                    tracing::warn!("Failed to load session: {e}");
                    None
                }
            });
        match saved {
            Some(SavedSession { theme, journal, .. }) => flow.restore(journal, theme),
            None => flow.restore(Vec::new(), config.app.initial_theme),
        }

        Self {
            flow,
            config,
            ports,
            exercise: ActiveExercise::None,
            pending_audio: None,
            session_path,
        }
    }

    #[must_use]
    pub fn flow(&self) -> &FlowStore {
        &self.flow
    }

    /// Direct store access for stage operations. The active exercise follows
    /// the new state on the next [`App::tick`].
    pub fn flow_mut(&mut self) -> &mut FlowStore {
        &mut self.flow
    }

    #[must_use]
    pub fn exercise(&self) -> &ActiveExercise {
        &self.exercise
    }

    pub fn exercise_mut(&mut self) -> &mut ActiveExercise {
        &mut self.exercise
    }

    #[must_use]
    pub fn config(&self) -> &ReframeConfig {
        &self.config
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.config.app.ui
    }

    #[must_use]
    pub fn is_audio_pending(&self) -> bool {
        self.pending_audio.is_some()
    }

    #[must_use]
    pub fn recorder_state(&self) -> RecorderState {
        self.ports.recorder.state()
    }

    #[must_use]
    pub fn recorder_supported(&self) -> bool {
        self.ports.recorder.is_supported()
    }

    /// One frame of work.
    pub fn tick(&mut self, delta: Duration) {
        self.sync_exercise();
        self.poll_audio();
        self.exercise.advance(delta);
        self.forward_exercise_events();
        self.flow.advance(delta);
        self.sync_exercise();
        self.persist_if_requested();
    }

    // ------------------------------------------------------------------------
    // Exercise lifecycle
    // ------------------------------------------------------------------------

    fn wanted_slot(&self) -> ExerciseSlot {
        let state = self.flow.state();
        match state.current_stage {
            Stage::OpennessPrimer => match state.openness_primer_exercise {
                PrimerExercise::PatternPuzzle => ExerciseSlot::PrimerPattern,
                PrimerExercise::SequenceTap => ExerciseSlot::PrimerSequence,
            },
            Stage::ImmediateReliefPractice => match state.relief_sub_stage {
                ReliefSubStage::Menu => ExerciseSlot::None,
                ReliefSubStage::PatternPuzzleRelief => ExerciseSlot::ReliefPuzzles,
                ReliefSubStage::AudioBreatheRelief => ExerciseSlot::Breath,
            },
            _ => ExerciseSlot::None,
        }
    }

    /// Replace the active exercise when the stage calls for a different one,
    /// or when the current run has already finished.
    fn sync_exercise(&mut self) {
        if self.exercise.has_finished() {
            self.forward_exercise_events();
        }
        let wanted = self.wanted_slot();
        if wanted == self.exercise.slot() && !self.exercise.has_finished() {
            return;
        }
        self.replace_exercise(wanted);
    }

    fn replace_exercise(&mut self, wanted: ExerciseSlot) {
        self.exercise.cancel();
        if let Some(pending) = self.pending_audio.take() {
            pending.handle.abort();
        }
        tracing::debug!(?wanted, "Switching exercise");

        self.exercise = match wanted {
            ExerciseSlot::None => ActiveExercise::None,
            ExerciseSlot::PrimerPattern => {
                ActiveExercise::PrimerPattern(PatternPuzzleRun::new(generate_pattern_puzzle(
                    self.flow.random(),
                )))
            }
            ExerciseSlot::PrimerSequence => ActiveExercise::PrimerSequence(SequenceTap::new(
                self.config.sequence,
                self.flow.random(),
                Arc::clone(&self.ports.tone),
            )),
            ExerciseSlot::ReliefPuzzles => {
                ActiveExercise::ReliefPuzzles(ReliefPuzzleRun::generate(self.flow.random()))
            }
            ExerciseSlot::Breath => ActiveExercise::Breath(BreathCue::new(
                self.config.breath,
                Arc::clone(&self.ports.tone),
                Arc::clone(&self.ports.speech),
            )),
        };
    }

    fn forward_exercise_events(&mut self) {
        let slot = self.exercise.slot();
        for event in self.exercise.take_events() {
            match event {
                ExerciseEvent::Toast {
                    message,
                    kind,
                    duration,
                } => {
                    self.flow.show_toast(message, kind, duration);
                }
                ExerciseEvent::Finished(outcome) => self.on_exercise_finished(slot, outcome),
            }
        }
    }

    fn on_exercise_finished(&mut self, slot: ExerciseSlot, outcome: ExerciseOutcome) {
        tracing::debug!(?slot, ?outcome, "Exercise finished");
        match (slot, outcome) {
            (ExerciseSlot::PrimerPattern | ExerciseSlot::PrimerSequence, ExerciseOutcome::Success) => {
                self.flow.succeed_openness_primer();
            }
            (ExerciseSlot::PrimerPattern | ExerciseSlot::PrimerSequence, ExerciseOutcome::Failure) => {
                if self.flow.fail_openness_primer_attempt() == PrimerAttempt::Exiting {
                    tracing::info!("Primer exhausted; moving to reinforcement");
                }
            }
            (ExerciseSlot::ReliefPuzzles | ExerciseSlot::Breath, ExerciseOutcome::Success) => {
                self.flow.complete_immediate_relief_exercise();
            }
            (_, ExerciseOutcome::ReturnToMenu) => {
                self.flow.return_to_relief_menu();
            }
            (slot, outcome) => {
                tracing::debug!(?slot, ?outcome, "Ignoring exercise outcome");
            }
        }
    }

    // ------------------------------------------------------------------------
    // Audio readiness
    // ------------------------------------------------------------------------

    /// Start the breath cue, unlocking audio first if needed.
    pub fn start_breath(&mut self) {
        if !matches!(self.exercise, ActiveExercise::Breath(_)) {
            return;
        }
        self.request_audio(AudioRequest::Breath);
    }

    /// Manual start for a sequence stalled on a suspended tone port.
    pub fn start_sequence(&mut self) {
        let stalled = matches!(
            &self.exercise,
            ActiveExercise::PrimerSequence(tap) if tap.phase() == SequencePhase::AwaitingStart
        );
        if stalled {
            self.request_audio(AudioRequest::Sequence);
        }
    }

    fn request_audio(&mut self, request: AudioRequest) {
        if let Some(ready) = AudioReady::observed(self.ports.tone.as_ref()) {
            self.grant_audio(request, ready);
            return;
        }
        if self.pending_audio.is_some() {
            return;
        }
        let tone = Arc::clone(&self.ports.tone);
        let handle = tokio::spawn(async move { ensure_audio_ready(tone.as_ref()).await });
        tracing::debug!(?request, "Awaiting audio readiness");
        self.pending_audio = Some(PendingAudio { request, handle });
    }

    fn poll_audio(&mut self) {
        let Some(pending) = self.pending_audio.take() else {
            return;
        };
        if !pending.handle.is_finished() {
            self.pending_audio = Some(pending);
            return;
        }
        let PendingAudio { request, mut handle } = pending;
        match (&mut handle).now_or_never() {
            Some(Ok(Ok(ready))) => self.grant_audio(request, ready),
            Some(Ok(Err(e))) => {
                tracing::warn!("{e}");
                self.flow.show_toast(e.to_string(), ToastKind::Warning, None);
            }
            Some(Err(e)) => {
                tracing::warn!("Audio readiness task failed: {e}");
                self.flow.show_toast(
                    AudioUnavailable::StillSuspended.to_string(),
                    ToastKind::Warning,
                    None,
                );
            }
            None => {
                // Finished but the join result is not observable yet; retry next frame.
                self.pending_audio = Some(PendingAudio { request, handle });
            }
        }
    }

    fn grant_audio(&mut self, request: AudioRequest, ready: AudioReady) {
        match (&mut self.exercise, request) {
            (ActiveExercise::Breath(cue), AudioRequest::Breath) => {
                cue.start(ready);
            }
            (ActiveExercise::PrimerSequence(tap), AudioRequest::Sequence) => {
                tap.start_playback(ready);
            }
            _ => tracing::debug!(?request, "Audio ready but exercise changed"),
        }
    }

    // ------------------------------------------------------------------------
    // Stage helpers that need the ports or a guard
    // ------------------------------------------------------------------------

    /// Pause the breath cue, optionally returning to the relief menu.
    pub fn stop_breath(&mut self, return_to_menu: bool) {
        if let ActiveExercise::Breath(cue) = &mut self.exercise {
            cue.stop(return_to_menu);
        } else if return_to_menu {
            self.flow.return_to_relief_menu();
        }
        self.forward_exercise_events();
        self.sync_exercise();
    }

    pub fn toggle_chime_only(&mut self) {
        if let ActiveExercise::Breath(cue) = &mut self.exercise {
            cue.toggle_chime_only();
        }
    }

    #[must_use]
    pub fn chime_only(&self) -> bool {
        match &self.exercise {
            ActiveExercise::Breath(cue) => cue.voice() == CueVoice::ChimeOnly,
            _ => self.config.breath.voice() == CueVoice::ChimeOnly,
        }
    }

    /// Every start builds a fresh engine, even for the exercise just left.
    pub fn start_relief(&mut self, kind: ReliefExercise) {
        self.flow.start_immediate_relief_exercise(kind);
        let wanted = self.wanted_slot();
        self.replace_exercise(wanted);
    }

    /// Leave the relief puzzles for the menu without reporting an outcome.
    pub fn skip_relief_puzzle(&mut self) {
        self.flow.skip_immediate_relief_puzzle();
        self.sync_exercise();
    }

    /// Proceed only once a reflection exists.
    pub fn proceed_from_clarity(&mut self) -> bool {
        if self.flow.state().clarity.is_empty() {
            self.flow
                .show_toast(CLARITY_REQUIRED_TOAST, ToastKind::Warning, None);
            return false;
        }
        self.flow.proceed_from_clarity();
        true
    }

    /// Start recording, or stop and keep the clip as the reflection.
    pub fn toggle_recording(&mut self) {
        let recorder = Arc::clone(&self.ports.recorder);
        if !recorder.is_supported() {
            self.flow
                .show_toast(RECORDING_UNSUPPORTED_TOAST, ToastKind::Warning, None);
            return;
        }
        if recorder.state() == RecorderState::Recording {
            match recorder.stop() {
                Some(clip) => self.flow.set_clarity_audio(clip),
                None => tracing::warn!("Recorder stopped without a clip"),
            }
            return;
        }
        if let Err(e) = recorder.start() {
            tracing::warn!("Recording failed to start: {e}");
            self.flow
                .show_toast(e.to_string(), ToastKind::Warning, None);
        }
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    pub fn save_session(&self) -> anyhow::Result<()> {
        let Some(path) = self.session_path.as_deref() else {
            return Ok(());
        };
        persistence::save_session(path, self.flow.state())?;
        Ok(())
    }

    fn persist_if_requested(&mut self) {
        if !self.flow.take_persist_request() {
            return;
        }
        if let Err(e) = self.save_session() {
            tracing::warn!("Session save failed: {e}");
        }
    }

    /// Tear down the active exercise and save. Called once at exit.
    pub fn shutdown(&mut self) {
        self.exercise.cancel();
        self.exercise = ActiveExercise::None;
        if let Some(pending) = self.pending_audio.take() {
            pending.handle.abort();
        }
        if let Err(e) = self.save_session() {
            tracing::warn!("Session save on exit failed: {e}");
        }
    }
}
