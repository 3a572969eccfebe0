//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir (settings + command table):
//!   Windows: %APPDATA%\voice-listener\
//!   macOS:   ~/Library/Application Support/voice-listener/
//!   Linux:   ~/.config/voice-listener/
//!
//! Data dir (GGML models for the live recognizer):
//!   Windows: %LOCALAPPDATA%\voice-listener\
//!   macOS:   ~/Library/Application Support/voice-listener/
//!   Linux:   ~/.local/share/voice-listener/

use std::path::PathBuf;

/// Resolved application directory and file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `commands.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to `commands.json` (serializable command table).
    pub commands_file: PathBuf,
    /// Directory for downloaded GGML model files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "voice-listener";

    /// Resolve all paths, falling back to the current directory when the
    /// platform cannot provide a standard location.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let commands_file = config_dir.join("commands.json");
        let models_dir = data_dir.join("models");

        Self {
            config_dir,
            settings_file,
            commands_file,
            models_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.models_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths
            .commands_file
            .file_name()
            .is_some_and(|n| n == "commands.json"));
    }
}
