//! Live recognition: microphone capture feeding chunked Whisper decodes.
//!
//! cpal streams are not `Send`, so the capture stream lives on a dedicated
//! OS thread for the lifetime of one recognizer start.  The thread forwards
//! mono chunks to an async decode loop, which accumulates a fixed-length
//! window, resamples it to 16 kHz, and runs the [`SttEngine`] on the
//! blocking thread pool.  Non-empty decodes are emitted as
//! [`RecognitionEvent::Final`]; decode failures as transient errors; the
//! capture stream disappearing as [`RecognitionEvent::Ended`].
//!
//! Stopping is drop-driven: the returned handle owns the capture thread's
//! stop channel, so dropping it unblocks the thread, which drops the stream
//! and releases the device.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::audio::{resample, MicChunk, MicError, MicSource};
use crate::stt::SttEngine;

use super::{
    RecognitionErrorKind, RecognitionEvent, RecognizerError, RecognizerHandle, SpeechRecognizer,
};

/// Sample rate the STT engine consumes.
const STT_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// LiveRecognizer
// ---------------------------------------------------------------------------

/// Production [`SpeechRecognizer`] backed by cpal + an [`SttEngine`].
pub struct LiveRecognizer {
    stt: Arc<dyn SttEngine>,
    device: Option<String>,
    window_samples: usize,
}

impl LiveRecognizer {
    /// Build a live recognizer.
    ///
    /// * `stt` — the decoding engine (shared, called via `spawn_blocking`).
    /// * `device` — cpal input device name, `None` for the system default.
    /// * `window_secs` — how much audio to accumulate per decode window.
    pub fn new(stt: Arc<dyn SttEngine>, device: Option<String>, window_secs: f32) -> Self {
        Self {
            stt,
            device,
            window_samples: (window_secs.max(0.5) * STT_RATE as f32) as usize,
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for LiveRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    async fn start(
        &self,
        events: mpsc::Sender<RecognitionEvent>,
    ) -> Result<Box<dyn RecognizerHandle>, RecognizerError> {
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel::<MicChunk>();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), MicError>>();
        let (stop_tx, stop_rx) = std::sync::mpsc::channel::<()>();
        let device = self.device.clone();

        std::thread::Builder::new()
            .name("mic-capture".into())
            .spawn(move || {
                let source = match MicSource::open(device.as_deref()) {
                    Ok(s) => s,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let stream = match source.stream(chunk_tx) {
                    Ok(s) => s,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                // Block until the handle is dropped; recv only errors once
                // every stop sender is gone.
                let _ = stop_rx.recv();
                drop(stream);
                log::debug!("mic-capture: stream released");
            })
            .map_err(|e| RecognizerError::Engine(e.to_string()))?;

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(RecognizerError::Capture(e)),
            Err(_) => {
                return Err(RecognizerError::Engine(
                    "capture thread exited before the stream started".into(),
                ))
            }
        }

        let stt = Arc::clone(&self.stt);
        let window = self.window_samples;
        tokio::spawn(decode_loop(stt, chunk_rx, events, window));

        Ok(Box::new(LiveHandle { _stop: stop_tx }))
    }
}

struct LiveHandle {
    _stop: std::sync::mpsc::Sender<()>,
}

impl RecognizerHandle for LiveHandle {}

// ---------------------------------------------------------------------------
// Decode loop
// ---------------------------------------------------------------------------

async fn decode_loop(
    stt: Arc<dyn SttEngine>,
    mut chunk_rx: mpsc::UnboundedReceiver<MicChunk>,
    events: mpsc::Sender<RecognitionEvent>,
    window: usize,
) {
    let mut pending: Vec<f32> = Vec::with_capacity(window * 2);

    while let Some(chunk) = chunk_rx.recv().await {
        pending.extend(resample(&chunk.samples, chunk.sample_rate, STT_RATE));
        if pending.len() < window {
            continue;
        }

        let audio = std::mem::take(&mut pending);
        let engine = Arc::clone(&stt);
        let decoded = tokio::task::spawn_blocking(move || engine.transcribe(&audio)).await;

        let event = match decoded {
            Ok(Ok(text)) if !text.is_empty() => RecognitionEvent::Final(text),
            Ok(Ok(_)) => continue, // silence window
            Ok(Err(e)) => {
                log::warn!("live decode failed: {e}");
                RecognitionEvent::Error(RecognitionErrorKind::Other(e.to_string()))
            }
            Err(e) => {
                log::warn!("decode task panicked: {e}");
                RecognitionEvent::Error(RecognitionErrorKind::Other(e.to_string()))
            }
        };

        if events.send(event).await.is_err() {
            return; // session went away
        }
    }

    // The capture stream closed while we were still running.
    let _ = events.send(RecognitionEvent::Ended).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
