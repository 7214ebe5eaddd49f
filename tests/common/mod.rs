//! Shared test utilities and fixtures
//!
//! Recording doubles for the capability ports and helpers that build an
//! [`App`] wired to them.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reframe_core::RandomSource;
use reframe_engine::{
    App, PortError, PortFut, Ports, RecorderPort, ReframeConfig, SpeechPort, ThreadRandom,
    TonePort,
};
use reframe_types::{AudioClip, RecorderState};

/// Tone double that records every index played.
#[derive(Debug, Default)]
pub struct ToneLog {
    ready: AtomicBool,
    unlocks: AtomicBool,
    played: Mutex<Vec<usize>>,
}

impl ToneLog {
    pub fn ready() -> Arc<Self> {
        let tone = Self::default();
        tone.ready.store(true, Ordering::SeqCst);
        tone.unlocks.store(true, Ordering::SeqCst);
        Arc::new(tone)
    }

    /// Starts suspended; `initialize` unlocks it only when `unlocks` is true.
    pub fn suspended(unlocks: bool) -> Arc<Self> {
        let tone = Self::default();
        tone.unlocks.store(unlocks, Ordering::SeqCst);
        Arc::new(tone)
    }

    pub fn played(&self) -> Vec<usize> {
        self.played.lock().unwrap().clone()
    }
}

impl TonePort for ToneLog {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn initialize(&self) -> PortFut<'_> {
        Box::pin(async move {
            if self.unlocks.load(Ordering::SeqCst) {
                self.ready.store(true, Ordering::SeqCst);
            }
            Ok(())
        })
    }

    fn resume(&self) -> PortFut<'_> {
        Box::pin(async move { Ok::<(), PortError>(()) })
    }

    fn play_tone(&self, index: usize) {
        self.played.lock().unwrap().push(index);
    }
}

#[derive(Debug, Default)]
pub struct SpeechLog {
    spoken: Mutex<Vec<String>>,
    cancels: Mutex<usize>,
}

impl SpeechLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> usize {
        *self.cancels.lock().unwrap()
    }
}

impl SpeechPort for SpeechLog {
    fn is_supported(&self) -> bool {
        true
    }

    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }

    fn cancel(&self) {
        *self.cancels.lock().unwrap() += 1;
    }
}

/// Recorder that hands back a two-second clip.
#[derive(Debug, Default)]
pub struct ClipRecorder {
    state: Mutex<RecorderState>,
}

impl RecorderPort for ClipRecorder {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&self) -> Result<(), PortError> {
        *self.state.lock().unwrap() = RecorderState::Recording;
        Ok(())
    }

    fn stop(&self) -> Option<AudioClip> {
        let mut state = self.state.lock().unwrap();
        if *state != RecorderState::Recording {
            return None;
        }
        *state = RecorderState::Finished;
        Some(AudioClip {
            bytes: vec![1, 2, 3, 4],
            mime_type: "audio/webm".to_string(),
            duration: Duration::from_secs(2),
        })
    }

    fn state(&self) -> RecorderState {
        *self.state.lock().unwrap()
    }
}

/// Doubles kept alongside the app so tests can inspect them.
pub struct Harness {
    pub app: App,
    pub tone: Arc<ToneLog>,
    pub speech: Arc<SpeechLog>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(ToneLog::ready(), Box::new(ThreadRandom), None)
    }

    pub fn with_tone(tone: Arc<ToneLog>) -> Self {
        Self::build(tone, Box::new(ThreadRandom), None)
    }

    pub fn with_rng(rng: Box<dyn RandomSource>) -> Self {
        Self::build(ToneLog::ready(), rng, None)
    }

    pub fn with_session(path: PathBuf) -> Self {
        Self::build(ToneLog::ready(), Box::new(ThreadRandom), Some(path))
    }

    fn build(
        tone: Arc<ToneLog>,
        rng: Box<dyn RandomSource>,
        session_path: Option<PathBuf>,
    ) -> Self {
        let speech = SpeechLog::new();
        let ports = Ports {
            tone: tone.clone(),
            speech: speech.clone(),
            recorder: Arc::new(ClipRecorder::default()),
        };
        let app = App::with_parts(ReframeConfig::default(), ports, rng, session_path);
        Self { app, tone, speech }
    }

    /// Advance in fixed steps, the way the frame loop does.
    pub fn run_for(&mut self, total: Duration, step: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            let delta = step.min(total - elapsed);
            self.app.tick(delta);
            elapsed += delta;
        }
    }

    pub fn tick(&mut self, delta: Duration) {
        self.app.tick(delta);
    }
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

pub fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}
