//! The voice-command table: categories, command specs, defaults and JSON
//! persistence.
//!
//! A [`CommandSpec`] is data only — phrases, description, category.  What a
//! command *does* is the host's business; the matcher reports hits by table
//! index and the host dispatches.  Keeping the table serializable lets users
//! edit `commands.json` without a rebuild.

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CommandCategory
// ---------------------------------------------------------------------------

/// Broad grouping of voice commands, part of the cooldown key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    /// Moving around the host interface (panels, menus, help).
    Navigation,
    /// Assistant requests (analysis, reset).
    Ai,
    /// Session and visibility control.
    Control,
    /// Diagnostics.
    System,
}

impl CommandCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CommandCategory::Navigation => "navigation",
            CommandCategory::Ai => "ai",
            CommandCategory::Control => "control",
            CommandCategory::System => "system",
        }
    }
}

impl std::fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CommandSpec
// ---------------------------------------------------------------------------

/// One voice command: the phrases that trigger it and what it is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Trigger phrases, matched case-insensitively as substrings of new
    /// transcript content.  Order within the list is the match order.
    pub phrases: Vec<String>,
    /// Human-readable purpose, for help displays.
    pub description: String,
    /// Grouping; also part of the cooldown key.
    pub category: CommandCategory,
}

impl CommandSpec {
    pub fn new(
        phrases: &[&str],
        description: &str,
        category: CommandCategory,
    ) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            description: description.to_string(),
            category,
        }
    }
}

// ---------------------------------------------------------------------------
// CommandTable
// ---------------------------------------------------------------------------

/// The full ordered command table.  Order matters: the matcher fires the
/// first command whose phrase appears in new content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandTable {
    pub commands: Vec<CommandSpec>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self {
            commands: default_specs(),
        }
    }
}

impl CommandTable {
    /// Load from a JSON file, returning the built-in defaults when the file
    /// does not exist yet.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save as pretty-printed JSON, creating directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// The built-in command table.
pub fn default_specs() -> Vec<CommandSpec> {
    use CommandCategory::*;

    vec![
        // AI
        CommandSpec::new(
            &["ask AI", "ask ai", "hey AI", "hey ai", "AI help", "ai help"],
            "Smart AI analysis (audio or screen)",
            Ai,
        ),
        CommandSpec::new(
            &["analyze screen", "analyze this", "what do you see", "screen analysis"],
            "Analyze current content",
            Ai,
        ),
        CommandSpec::new(
            &["start over", "new request", "reset", "clear all"],
            "Start over with new request",
            Ai,
        ),
        // Navigation
        CommandSpec::new(
            &["open chat", "start chat", "chat mode", "conversation"],
            "Open chat interface",
            Navigation,
        ),
        CommandSpec::new(
            &["show menu", "open menu", "more options", "settings menu"],
            "Show right side menu",
            Navigation,
        ),
        CommandSpec::new(
            &["show commands", "voice commands", "what can I say", "help commands"],
            "Show available voice commands",
            Navigation,
        ),
        CommandSpec::new(
            &["personalize", "settings", "customize", "preferences"],
            "Open personalization settings",
            Navigation,
        ),
        // Control
        CommandSpec::new(
            &["hide interface", "hide UI", "invisible mode", "hide everything"],
            "Hide the overlay interface",
            Control,
        ),
        CommandSpec::new(
            &["stop listening", "stop microphone", "mic off", "silence"],
            "Turn off microphone",
            Control,
        ),
        CommandSpec::new(
            &["close all", "close everything", "dismiss all", "clear screen"],
            "Close all open panels",
            Control,
        ),
        // System
        CommandSpec::new(
            &["debug mode", "show debug", "troubleshoot", "debug microphone"],
            "Open debug panel",
            System,
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_cover_every_category() {
        let table = CommandTable::default();
        assert_eq!(table.commands.len(), 11);

        for category in [
            CommandCategory::Navigation,
            CommandCategory::Ai,
            CommandCategory::Control,
            CommandCategory::System,
        ] {
            assert!(
                table.commands.iter().any(|c| c.category == category),
                "no default command in category {category}"
            );
        }
    }

    #[test]
    fn every_default_has_phrases_and_a_description() {
        for spec in default_specs() {
            assert!(!spec.phrases.is_empty());
            assert!(spec.phrases.iter().all(|p| !p.trim().is_empty()));
            assert!(!spec.description.is_empty());
        }
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&CommandCategory::Navigation).unwrap();
        assert_eq!(json, "\"navigation\"");
        let back: CommandCategory = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(back, CommandCategory::Ai);
    }

    #[test]
    fn round_trip_json() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("commands.json");

        let table = CommandTable::default();
        table.save_to(&path).expect("save");
        let loaded = CommandTable::load_from(&path).expect("load");

        assert_eq!(table.commands, loaded.commands);
    }

    #[test]
    fn load_missing_returns_defaults() {
        let dir = tempdir().expect("temp dir");
        let loaded = CommandTable::load_from(&dir.path().join("nope.json")).expect("load");
        assert_eq!(loaded.commands, default_specs());
    }
}
