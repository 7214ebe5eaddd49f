//! Saved session: the journal and theme.
//!
//! Written as JSON to `~/.reframe/session.json` through an atomic
//! temp-file-and-rename, so a crash mid-save leaves either the old or the new
//! file. Nothing else in the flow is persisted.

use std::fs;
use std::path::{Path, PathBuf};

use reframe_types::{AnchoredFrame, Theme};
use reframe_utils::{atomic_write, ensure_private_dir, recover_bak_file};
use serde::{Deserialize, Serialize};

use crate::flow::FlowState;

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// On-disk session layout.
///
/// A file written by a newer version is ignored rather than misread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub version: u32,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub journal: Vec<AnchoredFrame>,
}

impl SavedSession {
    pub const VERSION: u32 = 1;

    #[must_use]
    pub fn from_state(state: &FlowState) -> Self {
        Self {
            version: Self::VERSION,
            theme: state.theme,
            journal: state.journal.clone(),
        }
    }

    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version <= Self::VERSION
    }
}

/// `~/.reframe/session.json`.
#[must_use]
pub fn session_path() -> Option<PathBuf> {
    reframe_config::data_dir().map(|dir| dir.join(SESSION_FILE))
}

/// Read a saved session. `Ok(None)` when there is nothing usable to load.
pub fn load_session(path: &Path) -> Result<Option<SavedSession>, PersistError> {
    recover_bak_file(path);
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let session: SavedSession =
        serde_json::from_str(&data).map_err(|source| PersistError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    if !session.is_compatible() {
        tracing::debug!(
            version = session.version,
            "Session file from a newer version, starting fresh"
        );
        return Ok(None);
    }
    tracing::debug!(
        entries = session.journal.len(),
        "Loaded session from {}",
        path.display()
    );
    Ok(Some(session))
}

pub fn save_session(path: &Path, state: &FlowState) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_private_dir(parent).map_err(|source| PersistError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(&SavedSession::from_state(state))
        .map_err(PersistError::Encode)?;
    atomic_write(path, json.as_bytes()).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Saved session to {}", path.display());
    Ok(())
}
