//! Application settings, defaults and TOML persistence.
//!
//! Every timing and retry knob of the listening session is configuration
//! here rather than a literal in the state machine.  The asymmetric retry
//! thresholds (`max_error_count = 2` vs `max_restart_attempts = 3`) are
//! deliberate defaults carried over from the behaviour this crate models;
//! they are kept separate rather than unified.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::listener::simulation;

use super::AppPaths;

// ---------------------------------------------------------------------------
// ListenerConfig
// ---------------------------------------------------------------------------

/// Settings for the audio-listening session state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// Milliseconds to wait for capture access before falling back to
    /// simulation.
    pub capture_timeout_ms: u64,
    /// Delay before restarting recognition after an unexpected end-of-stream.
    pub restart_delay_ms: u64,
    /// Total failure/restart budget before an unexpected end-of-stream
    /// falls back to simulation.
    pub max_restart_attempts: u32,
    /// Transient recognition errors tolerated before falling back.
    pub max_error_count: u32,
    /// Interval between scripted utterances in simulation mode.
    pub simulation_interval_ms: u64,
    /// The scripted utterances, played in order and looped.
    pub simulation_script: Vec<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            capture_timeout_ms: 3_000,
            restart_delay_ms: 500,
            max_restart_attempts: 3,
            max_error_count: 2,
            simulation_interval_ms: 4_000,
            simulation_script: simulation::default_script(),
        }
    }
}

impl ListenerConfig {
    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn simulation_interval(&self) -> Duration {
        Duration::from_millis(self.simulation_interval_ms)
    }
}

// ---------------------------------------------------------------------------
// MatcherConfig
// ---------------------------------------------------------------------------

/// Settings for the voice-command matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Window during which a fired `(category, phrase)` pair may not
    /// re-trigger.
    pub cooldown_ms: u64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { cooldown_ms: 3_000 }
    }
}

impl MatcherConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the live recognizer's Whisper backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// GGML model file stem under the models directory (e.g. `"ggml-base.en"`).
    pub model: String,
    /// ISO-639-1 language code, or `"auto"`.
    pub language: String,
    /// cpal input device name — `None` means the system default.
    pub audio_device: Option<String>,
    /// Seconds of audio accumulated per decode window.
    pub window_secs: f32,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "ggml-base.en".into(),
            language: "en".into(),
            audio_device: None,
            window_secs: 3.0,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listening-session state machine settings.
    pub listener: ListenerConfig,
    /// Command-matcher settings.
    pub matcher: MatcherConfig,
    /// Live recognizer settings.
    pub stt: SttConfig,
}

impl AppConfig {
    /// Load from the platform `settings.toml`, returning defaults when the
    /// file does not exist yet (first run).
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save to the platform `settings.toml`, creating directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
