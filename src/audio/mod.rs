//! Audio capture and conversion for the live recognizer.
//!
//! ```text
//! Microphone → cpal callback → downmix_mono → MicChunk (mpsc)
//!            → resample(native, 16 kHz) → SttEngine
//! ```
//!
//! The rest of the crate never touches cpal directly; the live recognizer
//! owns the [`MicStream`] for the duration of a live attempt and drops it on
//! stop or fallback.

pub mod capture;
pub mod resample;

pub use capture::{MicChunk, MicError, MicSource, MicStream};
pub use resample::{downmix_mono, resample};
