//! Speech-to-text backend used by the live recognizer.
//!
//! The only consumer is [`crate::recognition::LiveRecognizer`], which feeds
//! 16 kHz mono windows through an `Arc<dyn SttEngine>` on the blocking
//! thread pool.

pub mod engine;

pub use engine::{SttEngine, SttError, WhisperEngine};

#[cfg(test)]
pub use engine::MockSttEngine;
