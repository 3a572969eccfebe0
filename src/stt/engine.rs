//! Speech-to-text engine trait and Whisper implementation.
//!
//! [`SttEngine`] is the narrow, object-safe interface the live recognizer
//! decodes through.  [`WhisperEngine`] wraps a `whisper_rs::WhisperContext`;
//! a fresh `WhisperState` is created per call so the engine can be shared
//! behind an `Arc<dyn SttEngine>` without locking.
//!
//! [`MockSttEngine`] (test-only) returns a canned response so recognizer
//! logic can be tested without a GGML model file.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// Errors surfaced by the STT subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// No model file at the given path.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// whisper-rs failed to initialise a context or per-call state.
    #[error("whisper initialisation failed: {0}")]
    Init(String),

    /// The inference pass itself failed.
    #[error("decode failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// SttEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe speech-to-text interface.
///
/// `audio` must be 16 kHz mono f32 PCM.  Implementations return the plain
/// transcript text; an empty string means "no speech in this window" and is
/// not an error.
pub trait SttEngine: Send + Sync {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SttEngine>) {}
};

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Production engine wrapping `whisper_rs`.
pub struct WhisperEngine {
    ctx: WhisperContext,
    language: String,
    n_threads: i32,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("language", &self.language)
            .field("n_threads", &self.n_threads)
            .finish_non_exhaustive()
    }
}

// WhisperContext declares Send + Sync in whisper-rs; model weights are
// read-only after load and each call gets its own WhisperState.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    /// Load a GGML model from `model_path`.
    ///
    /// `language` is an ISO-639-1 code, or `"auto"` for built-in detection.
    ///
    /// # Errors
    ///
    /// [`SttError::ModelNotFound`] when the file is missing,
    /// [`SttError::Init`] when whisper-rs rejects it.
    pub fn load(model_path: impl AsRef<Path>, language: impl Into<String>) -> Result<Self, SttError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path
            .to_str()
            .ok_or_else(|| SttError::ModelNotFound(path.display().to_string()))?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| SttError::Init(e.to_string()))?;

        let n_threads = std::thread::available_parallelism()
            .map(|n| n.get().min(4) as i32)
            .unwrap_or(2);

        Ok(Self {
            ctx,
            language: language.into(),
            n_threads,
        })
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        let lang: Option<&str> = if self.language == "auto" {
            None
        } else {
            Some(self.language.as_str())
        };
        params.set_language(lang);
        params.set_n_threads(self.n_threads);
        params.set_print_progress(false);
        params.set_print_realtime(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::Init(e.to_string()))?;

        state
            .full(params, audio)
            .map_err(|e| SttError::Decode(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Decode(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Decode(format!("segment {i}: {e}")))?;
            text.push_str(&segment);
        }

        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// Test double returning a pre-configured response.
#[cfg(test)]
pub struct MockSttEngine {
    response: Result<String, SttError>,
}

#[cfg(test)]
impl MockSttEngine {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, _audio: &[f32]) -> Result<String, SttError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
