//! Capability ports for tone, speech and recording.
//!
//! Exercise engines never touch audio hardware directly. They call these
//! traits, which the binary fills with terminal implementations and tests
//! fill with recording doubles. Ports are shared as `Arc<dyn ...>`.
//!
//! Only readiness is asynchronous: [`ensure_audio_ready`] awaits the tone
//! port once and hands back an [`AudioReady`] proof that the timed engines
//! require before they make any sound.

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

use reframe_types::{AudioClip, RecorderState};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    Unavailable(String),
}

pub type PortFut<'a> = Pin<Box<dyn Future<Output = Result<(), PortError>> + Send + 'a>>;

/// Short tone output. Indices select a pitch; implementations may ignore them.
pub trait TonePort: Send + Sync {
    /// Whether tones will actually play right now.
    fn is_ready(&self) -> bool;
    fn initialize(&self) -> PortFut<'_>;
    fn resume(&self) -> PortFut<'_>;
    fn play_tone(&self, index: usize);
}

pub trait SpeechPort: Send + Sync {
    fn is_supported(&self) -> bool;
    fn speak(&self, text: &str);
    /// Cancel any queued or in-progress utterance.
    fn cancel(&self);
}

pub trait RecorderPort: Send + Sync {
    fn is_supported(&self) -> bool;
    fn start(&self) -> Result<(), PortError>;
    fn stop(&self) -> Option<AudioClip>;
    fn state(&self) -> RecorderState;
}

/// Proof that the tone port was ready when this value was produced.
///
/// Only [`ensure_audio_ready`] constructs it.
#[derive(Debug, Clone, Copy)]
pub struct AudioReady {
    _private: (),
}

impl AudioReady {
    /// Proof for a port that is already ready, without awaiting anything.
    pub(crate) fn observed(tone: &dyn TonePort) -> Option<Self> {
        tone.is_ready().then_some(Self { _private: () })
    }

    #[cfg(test)]
    pub(crate) fn granted() -> Self {
        Self { _private: () }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioUnavailable {
    #[error("Audio could not be initialized: {0}")]
    Failed(PortError),
    #[error("Audio could not be initialized")]
    StillSuspended,
}

/// Bring the tone port to a ready state: initialize, then resume if still
/// suspended. No retries beyond that single pass.
pub async fn ensure_audio_ready(tone: &dyn TonePort) -> Result<AudioReady, AudioUnavailable> {
    if tone.is_ready() {
        return Ok(AudioReady { _private: () });
    }
    tone.initialize().await.map_err(AudioUnavailable::Failed)?;
    if !tone.is_ready() {
        tone.resume().await.map_err(AudioUnavailable::Failed)?;
    }
    if tone.is_ready() {
        tracing::debug!("Audio ready");
        Ok(AudioReady { _private: () })
    } else {
        tracing::warn!("Audio still suspended after resume");
        Err(AudioUnavailable::StillSuspended)
    }
}

// ============================================================================
// Terminal implementations
// ============================================================================

/// Rings the terminal bell. One pitch, so the tone index is ignored.
#[derive(Debug, Default)]
pub struct TerminalTone {
    ready: AtomicBool,
}

impl TerminalTone {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn unlock(&self) -> Result<(), PortError> {
        if io::stdout().is_terminal() {
            self.ready.store(true, Ordering::Release);
            Ok(())
        } else {
            Err(PortError::Unavailable("stdout is not a terminal".to_string()))
        }
    }
}

impl TonePort for TerminalTone {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn initialize(&self) -> PortFut<'_> {
        Box::pin(async move { self.unlock() })
    }

    fn resume(&self) -> PortFut<'_> {
        Box::pin(async move { self.unlock() })
    }

    fn play_tone(&self, index: usize) {
        if !self.is_ready() {
            return;
        }
        let mut stdout = io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
            tracing::debug!(index, "Terminal bell failed: {e}");
        }
    }
}

/// No speech synthesis in the terminal; cue words are shown as prompts instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

impl SpeechPort for SilentSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    fn speak(&self, _text: &str) {}

    fn cancel(&self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRecorder;

impl RecorderPort for UnsupportedRecorder {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&self) -> Result<(), PortError> {
        Err(PortError::Unavailable(
            "audio recording is not supported in the terminal".to_string(),
        ))
    }

    fn stop(&self) -> Option<AudioClip> {
        None
    }

    fn state(&self) -> RecorderState {
        RecorderState::Inactive
    }
}
