//! Built-in simulation script and transcript tagging.
//!
//! When live capture is unavailable or has failed, the session plays this
//! script back on a timer so downstream features (command matching, overlay
//! rendering) always have a transcript stream to work with.  The script is
//! a config default — hosts can replace it via
//! [`crate::config::ListenerConfig::simulation_script`].

/// Tag prepended to `audio_context` for live recognition results.
pub const LIVE_TAG: &str = "LIVE: ";

/// Tag prepended to `audio_context` for scripted playback.
pub const SIMULATED_TAG: &str = "SIMULATED: ";

/// Context line shown while live recognition is running but before the
/// first result arrives.
pub const LISTENING_BANNER: &str = "Listening... speak now";

/// The default scripted utterances, in playback order.
pub fn default_script() -> Vec<String> {
    [
        "Hello, this is a simulated transcript because your microphone isn't working properly.",
        "I planned all preparations. Four weeks from now is probably the earliest possible date.",
        "I'd like you to meet with two of my managers to discuss opinions about the meeting's location and timing.",
        "We need to finalize the project timeline by next Friday. The client is expecting a full report.",
        "Let's review the quarterly numbers before the board meeting. Sales are up 15% but we're seeing some concerning trends.",
        "The weather today is quite nice. I think we should have our meeting outdoors.",
        "This simulation allows you to test the interface even when the real microphone has issues.",
        "You can still use all the features with this simulated speech data.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
