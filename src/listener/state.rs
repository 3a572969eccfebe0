//! Session state shared between the listener task and its host.
//!
//! [`SessionMode`] is the capture state machine's current phase.
//! [`ListenerState`] is the full snapshot a host UI reads (transcript,
//! flags, advisory error).  [`SharedListenerState`] is the usual
//! `Arc<Mutex<…>>` handle — cheap to clone, lock briefly, never across an
//! `.await`.
//!
//! Ordered transcript delivery goes over a separate channel as
//! [`TranscriptUpdate`]s; the snapshot alone cannot guarantee the matcher
//! sees every intermediate value.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// SessionMode
// ---------------------------------------------------------------------------

/// Phase of one listening session.
///
/// ```text
/// Idle ──flag true──▶ LiveAttempt ──granted──▶ LiveActive
///   │                     │                        │
///   │                     │ timeout / refused      │ terminal error,
///   │                     ▼                        │ retries exhausted
///   └──unsupported──▶ Simulated ◀─────────────────┘
///
/// any state ──flag false──▶ Idle
/// ```
///
/// `Simulated` is sticky: nothing short of a stop/restart leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Not listening.
    Idle,
    /// Waiting for capture access (bounded by the capture timeout).
    LiveAttempt,
    /// Live recognition is delivering results.
    LiveActive,
    /// Scripted playback; live capture failed or is unavailable.
    Simulated,
}

impl SessionMode {
    /// True while the session is producing (or about to produce) transcripts.
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionMode::Idle)
    }

    /// Short label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            SessionMode::Idle => "Idle",
            SessionMode::LiveAttempt => "Connecting",
            SessionMode::LiveActive => "Listening",
            SessionMode::Simulated => "Simulated",
        }
    }
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Idle
    }
}

// ---------------------------------------------------------------------------
// ListenerState
// ---------------------------------------------------------------------------

/// Snapshot of the listening session, read by the host.
#[derive(Debug, Clone)]
pub struct ListenerState {
    /// Current phase of the session state machine.
    pub mode: SessionMode,
    /// Latest recognized or simulated utterance.  Replaced, not appended,
    /// on every update; cleared on stop.
    pub transcript: String,
    /// Human-readable context line, tagged to distinguish live from
    /// simulated origin.
    pub audio_context: String,
    /// Whether transcripts are currently being produced (live or simulated).
    pub is_recording: bool,
    /// Whether the transcript stream is scripted playback.
    pub is_simulated: bool,
    /// Last condition that caused a fallback.  Advisory only — never fatal
    /// to the host.  Cleared when a new session starts.
    pub error: String,
    /// Whether this runtime can attempt live capture at all.
    pub capture_supported: bool,
    /// Consecutive recognition failures/restarts this session.
    pub attempt_count: u32,
}

impl ListenerState {
    pub fn new(capture_supported: bool) -> Self {
        Self {
            mode: SessionMode::Idle,
            transcript: String::new(),
            audio_context: String::new(),
            is_recording: false,
            is_simulated: false,
            error: String::new(),
            capture_supported,
            attempt_count: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// SharedListenerState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`ListenerState`].
pub type SharedListenerState = Arc<Mutex<ListenerState>>;

/// Construct a fresh shared state.
pub fn new_shared_state(capture_supported: bool) -> SharedListenerState {
    Arc::new(Mutex::new(ListenerState::new(capture_supported)))
}

// ---------------------------------------------------------------------------
// TranscriptUpdate
// ---------------------------------------------------------------------------

/// One ordered transcript emission, as consumed by the command matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptUpdate {
    /// The utterance text (untagged).
    pub text: String,
    /// True when this came from the simulation script.
    pub simulated: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
