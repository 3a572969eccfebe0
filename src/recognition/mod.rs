//! The injected speech-recognition capability.
//!
//! The listening session never talks to cpal or Whisper directly — it drives
//! a [`SpeechRecognizer`] chosen once at startup, so the state machine is
//! identical whether real recognition is available or not:
//!
//! - [`LiveRecognizer`] — microphone capture + Whisper decoding.
//! - [`UnsupportedRecognizer`] — null object for environments without a
//!   model or audio stack; reports `is_supported() == false`.
//!
//! A started recognizer pushes [`RecognitionEvent`]s over an mpsc channel
//! and is stopped by dropping the returned handle.  Stopping releases the
//! capture device; no event arrives after the handle (and the session's
//! receiver) are gone.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::audio::MicError;

pub mod live;
pub mod unsupported;

pub use live::LiveRecognizer;
pub use unsupported::UnsupportedRecognizer;

// ---------------------------------------------------------------------------
// RecognitionEvent
// ---------------------------------------------------------------------------

/// Events delivered by a running recognizer, in occurrence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Interim hypothesis — replaces the current transcript, may be revised.
    Partial(String),
    /// Finalised utterance — replaces the current transcript.
    Final(String),
    /// The engine hit an error; the session decides whether to keep going.
    Error(RecognitionErrorKind),
    /// The engine stopped without being asked to.
    Ended,
}

// ---------------------------------------------------------------------------
// RecognitionErrorKind
// ---------------------------------------------------------------------------

/// Classification of in-session recognition errors.
///
/// Terminal kinds put the session straight into simulation; transient kinds
/// are counted and escalate only after `max_error_count` occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// Capture permission revoked mid-session.
    NotAllowed,
    /// The recognition backend lost its network/service connection.
    Network,
    /// The engine was aborted out from under us.
    Aborted,
    /// Audio-path failure (device unplugged, stream died).
    Audio(String),
    /// Anything else; treated as transient.
    Other(String),
}

impl RecognitionErrorKind {
    /// Terminal errors skip the retry budget entirely.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NotAllowed | Self::Network | Self::Aborted)
    }
}

impl std::fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAllowed => write!(f, "not-allowed"),
            Self::Network => write!(f, "network"),
            Self::Aborted => write!(f, "aborted"),
            Self::Audio(msg) => write!(f, "audio: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RecognizerError
// ---------------------------------------------------------------------------

/// Failures while *starting* a recognizer (as opposed to in-session
/// [`RecognitionEvent::Error`]s).
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("speech recognition is not supported in this environment")]
    Unsupported,

    #[error("microphone unavailable: {0}")]
    Capture(#[from] MicError),

    #[error("recognition engine failed to start: {0}")]
    Engine(String),
}

// ---------------------------------------------------------------------------
// SpeechRecognizer
// ---------------------------------------------------------------------------

/// Handle to a running recognizer.  Dropping it stops recognition and
/// releases the capture device.
pub trait RecognizerHandle: Send {}

/// Object-safe recognizer capability.
///
/// `start` must resolve only once capture access has actually been granted
/// (or refused) — the session races it against its capture timeout.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether live capture can work at all in this environment.
    ///
    /// When false the session goes straight to simulation without calling
    /// [`start`](Self::start).
    fn is_supported(&self) -> bool;

    /// Acquire the capture device and begin emitting events on `events`.
    async fn start(
        &self,
        events: mpsc::Sender<RecognitionEvent>,
    ) -> Result<Box<dyn RecognizerHandle>, RecognizerError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
