//! The listening-session subsystem.
//!
//! ```text
//!                    watch::Receiver<bool>  (listen/stop flag)
//!                              │
//!                              ▼
//!  SpeechRecognizer ──▶ AudioListener ──▶ mpsc::Sender<TranscriptUpdate>
//!       (trait)          (state machine)        (ordered, to matcher)
//!                              │
//!                              ▼
//!                    SharedListenerState  (snapshot, for hosts/UIs)
//! ```
//!
//! See [`session`] for the state machine itself and [`state`] for the
//! shared types.

pub mod session;
pub mod simulation;
pub mod state;

pub use session::AudioListener;
pub use simulation::{LISTENING_BANNER, LIVE_TAG, SIMULATED_TAG};
pub use state::{
    new_shared_state, ListenerState, SessionMode, SharedListenerState, TranscriptUpdate,
};
