//! Configuration loading for Reframe.
//!
//! The file lives at `~/.reframe/config.toml` (or wherever `REFRAME_CONFIG`
//! points). Raw TOML structs with optional fields stay private here and are
//! resolved into validated `reframe_types::settings` values at the parse
//! boundary, so the rest of the workspace never sees an unchecked duration.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use reframe_types::settings::{
    BreathSettings, CueVoice, SequenceSettings, SettingsError, ToastSettings,
};
use reframe_types::ui::UiOptions;
use reframe_types::Theme;
use serde::Deserialize;

/// Environment override for the config file location.
pub const CONFIG_PATH_ENV: &str = "REFRAME_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid [{section}] settings in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        section: &'static str,
        source: SettingsError,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    app: Option<RawAppConfig>,
    breath: Option<RawBreathConfig>,
    sequence: Option<RawSequenceConfig>,
    toast: Option<RawToastConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAppConfig {
    theme: Option<Theme>,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    high_contrast: bool,
    /// Use ASCII-only glyphs for shapes and markers.
    #[serde(default)]
    ascii_only: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawBreathConfig {
    total_secs: Option<u64>,
    inhale_secs: Option<u64>,
    hold_secs: Option<u64>,
    exhale_secs: Option<u64>,
    rest_secs: Option<u64>,
    /// Play tones without spoken cue words.
    #[serde(default)]
    chime_only: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawSequenceConfig {
    length: Option<u64>,
    positions: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawToastConfig {
    duration_ms: Option<u64>,
}

/// Appearance preferences resolved from `[app]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppSettings {
    /// Theme used when no saved session exists yet.
    pub initial_theme: Theme,
    pub ui: UiOptions,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReframeConfig {
    pub app: AppSettings,
    pub breath: BreathSettings,
    pub sequence: SequenceSettings,
    pub toast: ToastSettings,
}

impl ReframeConfig {
    /// Load from the default location. `Ok(None)` when no config file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        Self::parse(&content, path).map(Some)
    }

    /// Load, falling back to defaults on any error. Errors are logged.
    #[must_use]
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("No config file; using defaults");
                Self::default()
            }
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = match toml::from_str(content) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        Self::resolve(raw).map_err(|(section, source)| ConfigError::Invalid {
            path: path.to_path_buf(),
            section,
            source,
        })
    }

    fn resolve(raw: RawConfig) -> Result<Self, (&'static str, SettingsError)> {
        let app = raw.app.unwrap_or_default();
        let app = AppSettings {
            initial_theme: app.theme.unwrap_or_default(),
            ui: UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            },
        };

        let breath = match raw.breath {
            None => BreathSettings::default(),
            Some(breath) => {
                let phase = BreathSettings::DEFAULT_PHASE_SECS;
                let voice = if breath.chime_only {
                    CueVoice::ChimeOnly
                } else {
                    CueVoice::Spoken
                };
                BreathSettings::new(
                    breath
                        .total_secs
                        .unwrap_or(BreathSettings::DEFAULT_TOTAL_SECS),
                    [
                        breath.inhale_secs.unwrap_or(phase),
                        breath.hold_secs.unwrap_or(phase),
                        breath.exhale_secs.unwrap_or(phase),
                        breath.rest_secs.unwrap_or(phase),
                    ],
                    voice,
                )
                .map_err(|err| ("breath", err))?
            }
        };

        let sequence = match raw.sequence {
            None => SequenceSettings::default(),
            Some(sequence) => {
                let defaults = SequenceSettings::default();
                SequenceSettings::new(
                    sequence.length.unwrap_or(defaults.length() as u64),
                    sequence.positions.unwrap_or(defaults.positions() as u64),
                )
                .map_err(|err| ("sequence", err))?
            }
        };

        let toast = match raw.toast.and_then(|toast| toast.duration_ms) {
            None => ToastSettings::default(),
            Some(ms) => ToastSettings::new(ms).map_err(|err| ("toast", err))?,
        };

        Ok(Self {
            app,
            breath,
            sequence,
            toast,
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

/// Base directory for Reframe's files (`~/.reframe`).
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".reframe"))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    data_dir().map(|dir| dir.join("config.toml"))
}
