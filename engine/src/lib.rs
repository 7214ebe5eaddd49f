//! Core engine for Reframe: flow state machine, exercise engines and
//! orchestration.
//!
//! This crate contains the `App` state machine without TUI dependencies.

mod app;
pub mod exercises;
pub mod flow;
pub mod persistence;
pub mod ports;

pub use app::{ActiveExercise, App, Ports, RECORDING_UNSUPPORTED_TOAST};
pub use exercises::{
    BreathCue, BreathPhase, ChoiceResult, ExerciseEvent, ExerciseOutcome, PatternPuzzleRun,
    ReliefPuzzleRun, SequencePhase, SequenceTap, TapResult,
};
pub use flow::{AFFIRMATIONS, AnchorError, FlowState, FlowStore, NOT_READY_MESSAGE};
pub use persistence::{PersistError, SavedSession};
pub use ports::{
    AudioReady, AudioUnavailable, PortError, PortFut, RecorderPort, SpeechPort, TonePort,
    ensure_audio_ready,
};

// Re-export from crates for public API
pub use reframe_config::ReframeConfig;
pub use reframe_core::{RandomSource, SequenceRandom, ThreadRandom};
pub use reframe_types::{
    EvidenceKind, FrameId, PrimerExercise, ReliefExercise, ReliefSubStage, Shape, Stage, Theme,
    ToastKind,
};
