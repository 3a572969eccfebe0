//! Null-object recognizer for environments without live capture.
//!
//! Selected at startup when no Whisper model (or no audio stack) is
//! available.  The session sees `is_supported() == false` and goes straight
//! to simulation, so none of the state-machine code needs to special-case a
//! missing engine.

use tokio::sync::mpsc;

use super::{RecognitionEvent, RecognizerError, RecognizerHandle, SpeechRecognizer};

/// A [`SpeechRecognizer`] that can never capture.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRecognizer;

#[async_trait::async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    async fn start(
        &self,
        _events: mpsc::Sender<RecognitionEvent>,
    ) -> Result<Box<dyn RecognizerHandle>, RecognizerError> {
        Err(RecognizerError::Unsupported)
    }
}
