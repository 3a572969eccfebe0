//! Delta-based phrase matching over the transcript stream.
//!
//! The transcript is a *replacement* value, not an append-only log, so the
//! matcher keeps the last transcript it processed and only scans the new
//! content (the delta).  Matching is a case-insensitive substring check,
//! table order decides ties, and at most one command fires per update.
//!
//! Each fired `(category, phrase)` pair enters a cooldown window during
//! which it cannot re-trigger; a cooling-down match does not stop the scan,
//! later phrases and commands are still considered.  Cooldowns expire
//! lazily against `tokio::time::Instant`, so there is no timer task to
//! leak — and nothing to cancel when listening stops.
//!
//! The command list is an argument to every [`CommandMatcher::process`]
//! call, not matcher state, so hosts can swap commands between updates.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::time::{Duration, Instant};

use crate::config::MatcherConfig;

use super::table::{CommandCategory, CommandSpec};

// ---------------------------------------------------------------------------
// VoiceCommand
// ---------------------------------------------------------------------------

/// What a fired command runs.  Kept `Send + Sync` so command lists can be
/// shared with the matcher task.
pub type CommandAction = Arc<dyn Fn() + Send + Sync>;

/// A [`CommandSpec`] bound to a runtime action.
#[derive(Clone)]
pub struct VoiceCommand {
    /// Trigger phrases, matched case-insensitively against the delta.
    pub phrases: Vec<String>,
    /// Human-readable purpose, reported back in [`CommandHit`]s.
    pub description: String,
    /// Grouping; also part of the cooldown key.
    pub category: CommandCategory,
    /// Invoked synchronously when the command fires.
    pub action: CommandAction,
}

impl VoiceCommand {
    pub fn from_spec(spec: CommandSpec, action: CommandAction) -> Self {
        Self {
            phrases: spec.phrases,
            description: spec.description,
            category: spec.category,
            action,
        }
    }
}

impl std::fmt::Debug for VoiceCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceCommand")
            .field("phrases", &self.phrases)
            .field("description", &self.description)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// CommandHit
// ---------------------------------------------------------------------------

/// Report of a command that fired, returned to the caller after the action
/// has already run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHit {
    /// Index into the command list passed to `process`.
    pub index: usize,
    /// Category of the fired command.
    pub category: CommandCategory,
    /// The phrase (original casing) that triggered it.
    pub phrase: String,
    /// Description of the fired command.
    pub description: String,
}

// ---------------------------------------------------------------------------
// CommandMatcher
// ---------------------------------------------------------------------------

/// Matches transcript updates against a command list.
///
/// Synchronous and single-owner; feed it transcript values in the order the
/// listener emitted them.  A `process` call with `is_listening == false`
/// resets the baseline and cooldowns, so hosts that route their stop signal
/// through `process` need no extra bookkeeping; [`clear`](Self::clear) does
/// the same explicitly.
pub struct CommandMatcher {
    cooldown: Duration,
    last_processed: String,
    was_listening: bool,
    cooldowns: HashMap<(CommandCategory, String), Instant>,
}

impl CommandMatcher {
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            cooldown: config.cooldown(),
            last_processed: String::new(),
            was_listening: false,
            cooldowns: HashMap::new(),
        }
    }

    /// Process one transcript value against `commands`.
    ///
    /// At most one command fires per call: the first in list order whose
    /// phrase appears in the new content and is not cooling down.  Its
    /// action runs before this returns; the returned [`CommandHit`] is the
    /// notification for the host.
    pub fn process(
        &mut self,
        transcript: &str,
        is_listening: bool,
        commands: &[VoiceCommand],
    ) -> Option<CommandHit> {
        self.process_at(transcript, is_listening, commands, Instant::now())
    }

    fn process_at(
        &mut self,
        transcript: &str,
        is_listening: bool,
        commands: &[VoiceCommand],
        now: Instant,
    ) -> Option<CommandHit> {
        if !is_listening {
            if self.was_listening {
                self.clear();
            }
            self.was_listening = false;
            return None;
        }
        self.was_listening = true;

        if transcript.is_empty() || transcript == self.last_processed {
            return None;
        }

        // Only the content added since the last processed transcript.
        let delta = transcript
            .replacen(self.last_processed.as_str(), "", 1)
            .to_lowercase();
        let delta = delta.trim();
        if delta.is_empty() {
            // Nothing new; keep the baseline as-is so a later, longer
            // transcript still diffs against real content.
            return None;
        }

        self.cooldowns.retain(|_, expires| now < *expires);

        let mut hit = None;
        'scan: for (index, command) in commands.iter().enumerate() {
            for phrase in &command.phrases {
                if !delta.contains(&phrase.to_lowercase()) {
                    continue;
                }

                let key = (command.category, phrase.clone());
                if self.cooldowns.contains_key(&key) {
                    // Suppressed; later phrases and commands still get a look.
                    continue;
                }

                log::debug!("voice command fired: {phrase:?} ({})", command.category);
                (command.action)();
                self.cooldowns.insert(key, now + self.cooldown);
                hit = Some(CommandHit {
                    index,
                    category: command.category,
                    phrase: phrase.clone(),
                    description: command.description.clone(),
                });
                break 'scan;
            }
        }

        // The baseline advances whether or not anything fired.
        self.last_processed = transcript.to_string();
        hit
    }

    /// Forget the processed baseline and all cooldowns.  Equivalent to one
    /// `process` call with `is_listening == false`.
    pub fn clear(&mut self) {
        self.last_processed.clear();
        self.cooldowns.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
