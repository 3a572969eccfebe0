//! voice-listener — resilient audio listening with voice-command matching.
//!
//! The library behind an always-on assistant overlay's ears.  It owns two
//! jobs:
//!
//! * **Listening session** ([`listener`]): a state machine that attempts
//!   live speech recognition (cpal capture + Whisper decode), falls back to
//!   scripted simulation when capture is refused, times out, or keeps
//!   failing, and publishes every transcript in order.  Failures never
//!   propagate to the host; it always gets a transcript stream.
//! * **Voice commands** ([`commands`]): delta-based phrase matching over
//!   that stream, with per-`(category, phrase)` cooldowns.
//!
//! ```text
//!  cpal mic ─▶ resample ─▶ Whisper ─┐
//!                                   ├─▶ AudioListener ─▶ TranscriptUpdate ─▶ CommandMatcher
//!  simulation script ───────────────┘        ▲
//!                                            │
//!                                  watch flag (listen/stop)
//! ```
//!
//! Hosts inject the recognition capability as an `Arc<dyn SpeechRecognizer>`
//! ([`recognition`]); [`recognition::UnsupportedRecognizer`] stands in on
//! runtimes without capture support.

pub mod audio;
pub mod commands;
pub mod config;
pub mod listener;
pub mod recognition;
pub mod stt;
