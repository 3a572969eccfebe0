//! The audio-listening session state machine.
//!
//! [`AudioListener`] is an actor driven by a single boolean watch flag, the
//! host's listen/stop toggle.  While the flag is true it runs one *session*:
//! attempt live recognition through the injected [`SpeechRecognizer`], fall
//! back to scripted simulation on refusal, timeout, terminal error or an
//! exhausted retry budget, and publish every transcript in order.
//!
//! ```text
//! flag true
//!   └─▶ LiveAttempt: recognizer.start() raced against capture_timeout
//!         ├─ granted ──▶ LiveActive: Partial/Final → publish
//!         │                ├─ transient error ×max_error_count ──▶ Simulated
//!         │                ├─ terminal error ───────────────────▶ Simulated
//!         │                └─ Ended ×max_restart_attempts ──────▶ Simulated
//!         │                   (fewer: restart after restart_delay)
//!         └─ refused / timed out ──▶ Simulated
//! flag false (any state)
//!   └─▶ Idle: drop capture handle, cancel timers, clear transcript
//! ```
//!
//! Simulation is sticky for the session: once entered, only a stop/restart
//! returns to a live attempt.  No failure propagates to the host — the
//! advisory `error` string and the `is_simulated` flag are the only signals.
//!
//! All timers live inside `select!` arms, so observing the stop flag drops
//! them in the same poll; nothing keeps firing after stop.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, sleep, timeout, MissedTickBehavior};

use crate::config::ListenerConfig;
use crate::recognition::{RecognitionEvent, SpeechRecognizer};

use super::simulation::{LISTENING_BANNER, LIVE_TAG, SIMULATED_TAG};
use super::state::{SessionMode, SharedListenerState, TranscriptUpdate};

// ---------------------------------------------------------------------------
// AudioListener
// ---------------------------------------------------------------------------

/// Owns the listening-session lifecycle.
///
/// Create with [`AudioListener::new`] and spawn [`run`](Self::run) as a
/// tokio task; drive it exclusively through the watch flag passed to `run`.
pub struct AudioListener {
    config: ListenerConfig,
    recognizer: Arc<dyn SpeechRecognizer>,
    state: SharedListenerState,
    update_tx: mpsc::Sender<TranscriptUpdate>,
}

/// How a live phase ended.
#[derive(Debug, PartialEq, Eq)]
enum LiveOutcome {
    /// The host turned the flag off.
    Stopped,
    /// Live capture gave up; the session continues in simulation.
    FellBack,
}

impl AudioListener {
    /// Build a listener.
    ///
    /// * `state` — shared snapshot the host reads; construct it with
    ///   [`super::new_shared_state`] using `recognizer.is_supported()`.
    /// * `update_tx` — ordered transcript stream for the command matcher.
    pub fn new(
        config: ListenerConfig,
        recognizer: Arc<dyn SpeechRecognizer>,
        state: SharedListenerState,
        update_tx: mpsc::Sender<TranscriptUpdate>,
    ) -> Self {
        Self {
            config,
            recognizer,
            state,
            update_tx,
        }
    }

    /// Run until the flag sender is dropped.
    ///
    /// One session per true→false flag cycle.  Teardown (clearing the
    /// transcript, cancelling timers, releasing capture) happens before the
    /// next Idle wait begins.
    pub async fn run(self, mut flag: watch::Receiver<bool>) {
        loop {
            // Idle — wait for the host to enable listening.
            loop {
                if flag.has_changed().is_err() {
                    return; // host dropped the flag
                }
                if *flag.borrow_and_update() {
                    break;
                }
                if flag.changed().await.is_err() {
                    return;
                }
            }

            log::info!("listener: session starting");
            self.run_session(&mut flag).await;
            self.teardown();
            log::info!("listener: session stopped");
        }
    }

    // -----------------------------------------------------------------------
    // Session phases
    // -----------------------------------------------------------------------

    /// One full session; returns only once the flag is false (or closed).
    async fn run_session(&self, flag: &mut watch::Receiver<bool>) {
        {
            let mut st = self.state.lock().unwrap();
            st.error.clear();
            st.attempt_count = 0;
        }

        if !self.recognizer.is_supported() {
            self.record_error("speech recognition not supported - using simulation");
            self.run_simulation(flag).await;
            return;
        }

        if self.run_live(flag).await == LiveOutcome::Stopped {
            return;
        }
        // Sticky from here on: no path out of simulation but a stop.
        self.run_simulation(flag).await;
    }

    /// Live attempt/active phase, including the restart loop.
    async fn run_live(&self, flag: &mut watch::Receiver<bool>) -> LiveOutcome {
        // One budget shared by error and end-of-stream escalation; the
        // thresholds differ (max_error_count vs max_restart_attempts).
        let mut attempts: u32 = 0;

        loop {
            self.set_mode(SessionMode::LiveAttempt);

            let (event_tx, mut event_rx) = mpsc::channel::<RecognitionEvent>(32);

            let started = tokio::select! {
                biased;
                _ = Self::stopped(flag) => return LiveOutcome::Stopped,
                res = timeout(self.config.capture_timeout(), self.recognizer.start(event_tx)) => res,
            };

            let mut handle = match started {
                Ok(Ok(handle)) => Some(handle),
                Ok(Err(e)) => {
                    self.record_error(format!("microphone failed: {e} - using simulation"));
                    return LiveOutcome::FellBack;
                }
                Err(_elapsed) => {
                    self.record_error("microphone access timed out - using simulation");
                    return LiveOutcome::FellBack;
                }
            };

            {
                let mut st = self.state.lock().unwrap();
                st.mode = SessionMode::LiveActive;
                st.is_recording = true;
                st.is_simulated = false;
                st.error.clear();
                st.audio_context = LISTENING_BANNER.to_string();
            }
            log::info!("listener: live recognition active");

            loop {
                let event = tokio::select! {
                    biased;
                    _ = Self::stopped(flag) => {
                        drop(handle.take());
                        return LiveOutcome::Stopped;
                    }
                    ev = event_rx.recv() => ev,
                };

                match event {
                    Some(RecognitionEvent::Partial(text))
                    | Some(RecognitionEvent::Final(text)) => {
                        self.publish(text, false).await;
                    }

                    Some(RecognitionEvent::Error(kind)) => {
                        attempts += 1;
                        self.set_attempt_count(attempts);

                        if kind.is_terminal() || attempts >= self.config.max_error_count {
                            self.record_error(format!(
                                "recognition error ({kind}) - using simulation"
                            ));
                            drop(handle.take());
                            return LiveOutcome::FellBack;
                        }
                        log::warn!(
                            "listener: transient recognition error ({kind}), attempt {attempts}"
                        );
                    }

                    Some(RecognitionEvent::Ended) | None => {
                        attempts += 1;
                        self.set_attempt_count(attempts);
                        drop(handle.take());

                        if attempts >= self.config.max_restart_attempts {
                            self.record_error("recognition kept stopping - using simulation");
                            return LiveOutcome::FellBack;
                        }

                        log::warn!("listener: recognition ended unexpectedly, restart {attempts}");
                        tokio::select! {
                            biased;
                            _ = Self::stopped(flag) => return LiveOutcome::Stopped,
                            _ = sleep(self.config.restart_delay()) => {}
                        }
                        break; // back to LiveAttempt
                    }
                }
            }
        }
    }

    /// Scripted playback until the flag turns false.
    async fn run_simulation(&self, flag: &mut watch::Receiver<bool>) {
        {
            let mut st = self.state.lock().unwrap();
            st.mode = SessionMode::Simulated;
            st.is_recording = true;
            st.is_simulated = true;
        }
        log::info!("listener: simulation mode active");

        let script = &self.config.simulation_script;
        if script.is_empty() {
            Self::stopped(flag).await;
            return;
        }

        // First utterance immediately, then one per interval, looping.
        self.publish(script[0].clone(), true).await;
        let mut next = 1usize;

        let mut ticker = interval(self.config.simulation_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // consume the immediate first tick

        loop {
            tokio::select! {
                biased;
                _ = Self::stopped(flag) => return,
                _ = ticker.tick() => {
                    if next >= script.len() {
                        next = 0;
                    }
                    self.publish(script[next].clone(), true).await;
                    next += 1;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Resolves when the flag turns false or the host drops it.
    async fn stopped(flag: &mut watch::Receiver<bool>) {
        loop {
            if !*flag.borrow_and_update() {
                return;
            }
            if flag.changed().await.is_err() {
                return;
            }
        }
    }

    /// Replace the transcript and push the update downstream, in order.
    async fn publish(&self, text: String, simulated: bool) {
        {
            let mut st = self.state.lock().unwrap();
            let tag = if simulated { SIMULATED_TAG } else { LIVE_TAG };
            st.audio_context = format!("{tag}{text}");
            st.transcript = text.clone();
        }
        // Receiver gone just means nobody is matching commands.
        let _ = self.update_tx.send(TranscriptUpdate { text, simulated }).await;
    }

    fn set_mode(&self, mode: SessionMode) {
        self.state.lock().unwrap().mode = mode;
    }

    fn set_attempt_count(&self, attempts: u32) {
        self.state.lock().unwrap().attempt_count = attempts;
    }

    fn record_error(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("listener: {message}");
        self.state.lock().unwrap().error = message;
    }

    /// Reset everything the host observes; runs after every session.
    fn teardown(&self) {
        let mut st = self.state.lock().unwrap();
        st.mode = SessionMode::Idle;
        st.transcript.clear();
        st.audio_context.clear();
        st.is_recording = false;
        st.is_simulated = false;
        st.attempt_count = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::new_shared_state;
    use crate::recognition::{
        RecognitionErrorKind, RecognizerError, RecognizerHandle, UnsupportedRecognizer,
    };
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// What one `start` call should do.
    enum StartScript {
        /// Refuse capture access immediately.
        Refuse,
        /// Never resolve — a permission prompt that hangs forever.
        Hang,
        /// Grant access, then deliver these events in order.
        Emit(Vec<RecognitionEvent>),
    }

    /// Recognizer driven by a queue of [`StartScript`]s, one per start call.
    /// An exhausted queue grants access and stays silent.
    struct FakeRecognizer {
        scripts: StdMutex<VecDeque<StartScript>>,
        starts: Arc<AtomicUsize>,
        handles_alive: Arc<AtomicUsize>,
    }

    impl FakeRecognizer {
        fn new(scripts: Vec<StartScript>) -> Arc<Self> {
            Arc::new(Self {
                scripts: StdMutex::new(scripts.into()),
                starts: Arc::new(AtomicUsize::new(0)),
                handles_alive: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    struct FakeHandle {
        alive: Arc<AtomicUsize>,
    }

    impl RecognizerHandle for FakeHandle {}

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.alive.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl SpeechRecognizer for FakeRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        async fn start(
            &self,
            events: mpsc::Sender<RecognitionEvent>,
        ) -> Result<Box<dyn RecognizerHandle>, RecognizerError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            let script = self.scripts.lock().unwrap().pop_front();

            match script {
                Some(StartScript::Refuse) => {
                    Err(RecognizerError::Engine("capture refused".into()))
                }
                Some(StartScript::Hang) => std::future::pending().await,
                other => {
                    let queued = match other {
                        Some(StartScript::Emit(q)) => q,
                        _ => Vec::new(),
                    };
                    tokio::spawn(async move {
                        for event in queued {
                            if events.send(event).await.is_err() {
                                return;
                            }
                        }
                        // Keep the sender alive: an exhausted script stays
                        // silent, it does not close the event stream.
                        std::future::pending::<()>().await;
                    });
                    self.handles_alive.fetch_add(1, Ordering::SeqCst);
                    Ok(Box::new(FakeHandle {
                        alive: Arc::clone(&self.handles_alive),
                    }))
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Harness
    // -----------------------------------------------------------------------

    struct Harness {
        state: SharedListenerState,
        update_rx: mpsc::Receiver<TranscriptUpdate>,
        flag_tx: watch::Sender<bool>,
    }

    fn test_config() -> ListenerConfig {
        ListenerConfig {
            simulation_script: vec!["alpha".into(), "beta".into(), "gamma".into()],
            ..ListenerConfig::default()
        }
    }

    fn spawn_listener(config: ListenerConfig, recognizer: Arc<dyn SpeechRecognizer>) -> Harness {
        let state = new_shared_state(recognizer.is_supported());
        let (update_tx, update_rx) = mpsc::channel(64);
        let (flag_tx, flag_rx) = watch::channel(false);

        let listener = AudioListener::new(config, recognizer, Arc::clone(&state), update_tx);
        tokio::spawn(listener.run(flag_rx));

        Harness {
            state,
            update_rx,
            flag_tx,
        }
    }

    async fn wait_for_mode(state: &SharedListenerState, mode: SessionMode) {
        for _ in 0..400 {
            if state.lock().unwrap().mode == mode {
                return;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!(
            "mode never became {mode:?}; state = {:?}",
            state.lock().unwrap()
        );
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// Stop on an Idle session is a no-op: no mode change, no updates.
    #[tokio::test(start_paused = true)]
    async fn stop_while_idle_is_a_noop() {
        let mut h = spawn_listener(test_config(), FakeRecognizer::new(vec![]));

        h.flag_tx.send(false).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(h.state.lock().unwrap().mode, SessionMode::Idle);
        assert!(h.update_rx.try_recv().is_err());
    }

    /// No capture support → straight to simulation, with an advisory error.
    #[tokio::test(start_paused = true)]
    async fn unsupported_runtime_goes_straight_to_simulation() {
        let mut h = spawn_listener(test_config(), Arc::new(UnsupportedRecognizer));

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::Simulated).await;

        let first = h.update_rx.recv().await.unwrap();
        assert_eq!(first, TranscriptUpdate { text: "alpha".into(), simulated: true });

        let st = h.state.lock().unwrap();
        assert!(st.is_simulated);
        assert!(st.is_recording);
        assert!(!st.capture_supported);
        assert!(!st.error.is_empty());
        assert!(st.audio_context.starts_with(SIMULATED_TAG));
    }

    /// Capture access not resolving within the timeout falls back to
    /// simulation with a non-empty error.
    #[tokio::test(start_paused = true)]
    async fn capture_timeout_falls_back_to_simulation() {
        let started = tokio::time::Instant::now();
        let h = spawn_listener(test_config(), FakeRecognizer::new(vec![StartScript::Hang]));

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::Simulated).await;

        assert!(started.elapsed() >= Duration::from_secs(3));
        let st = h.state.lock().unwrap();
        assert!(st.error.contains("timed out"), "error = {:?}", st.error);
        assert!(st.is_simulated);
    }

    /// A refused capture request falls back immediately.
    #[tokio::test(start_paused = true)]
    async fn refused_capture_falls_back() {
        let h = spawn_listener(test_config(), FakeRecognizer::new(vec![StartScript::Refuse]));

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::Simulated).await;

        let st = h.state.lock().unwrap();
        assert!(st.error.contains("microphone failed"), "error = {:?}", st.error);
    }

    /// Partial and Final results both replace the transcript, LIVE-tagged.
    #[tokio::test(start_paused = true)]
    async fn live_results_replace_the_transcript() {
        let recognizer = FakeRecognizer::new(vec![StartScript::Emit(vec![
            RecognitionEvent::Partial("hel".into()),
            RecognitionEvent::Final("hello there".into()),
        ])]);
        let mut h = spawn_listener(test_config(), recognizer);

        h.flag_tx.send(true).unwrap();

        assert_eq!(
            h.update_rx.recv().await.unwrap(),
            TranscriptUpdate { text: "hel".into(), simulated: false }
        );
        assert_eq!(
            h.update_rx.recv().await.unwrap(),
            TranscriptUpdate { text: "hello there".into(), simulated: false }
        );

        let st = h.state.lock().unwrap();
        assert_eq!(st.mode, SessionMode::LiveActive);
        assert_eq!(st.transcript, "hello there");
        assert_eq!(st.audio_context, format!("{LIVE_TAG}hello there"));
        assert!(!st.is_simulated);
        assert!(st.error.is_empty());
    }

    /// Three consecutive unexpected ends exhaust the restart budget.
    #[tokio::test(start_paused = true)]
    async fn three_unexpected_ends_fall_back() {
        let recognizer = FakeRecognizer::new(vec![
            StartScript::Emit(vec![RecognitionEvent::Ended]),
            StartScript::Emit(vec![RecognitionEvent::Ended]),
            StartScript::Emit(vec![RecognitionEvent::Ended]),
        ]);
        let starts = Arc::clone(&recognizer.starts);
        let h = spawn_listener(test_config(), recognizer);

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::Simulated).await;

        assert_eq!(starts.load(Ordering::SeqCst), 3);
        assert_eq!(h.state.lock().unwrap().attempt_count, 3);
    }

    /// Two ends followed by a healthy stream stays live.
    #[tokio::test(start_paused = true)]
    async fn fewer_ends_keep_retrying_live() {
        let recognizer = FakeRecognizer::new(vec![
            StartScript::Emit(vec![RecognitionEvent::Ended]),
            StartScript::Emit(vec![RecognitionEvent::Ended]),
            StartScript::Emit(vec![RecognitionEvent::Final("back online".into())]),
        ]);
        let starts = Arc::clone(&recognizer.starts);
        let mut h = spawn_listener(test_config(), recognizer);

        h.flag_tx.send(true).unwrap();

        assert_eq!(
            h.update_rx.recv().await.unwrap().text,
            "back online".to_string()
        );
        assert_eq!(starts.load(Ordering::SeqCst), 3);
        assert_eq!(h.state.lock().unwrap().mode, SessionMode::LiveActive);
    }

    /// Transient errors escalate at max_error_count (default 2).
    #[tokio::test(start_paused = true)]
    async fn repeated_transient_errors_fall_back() {
        let recognizer = FakeRecognizer::new(vec![StartScript::Emit(vec![
            RecognitionEvent::Error(RecognitionErrorKind::Other("blip".into())),
            RecognitionEvent::Error(RecognitionErrorKind::Other("blip".into())),
        ])]);
        let starts = Arc::clone(&recognizer.starts);
        let h = spawn_listener(test_config(), recognizer);

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::Simulated).await;

        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert_eq!(h.state.lock().unwrap().attempt_count, 2);
    }

    /// A single transient error does not interrupt live recognition.
    #[tokio::test(start_paused = true)]
    async fn single_transient_error_stays_live() {
        let recognizer = FakeRecognizer::new(vec![StartScript::Emit(vec![
            RecognitionEvent::Error(RecognitionErrorKind::Other("blip".into())),
            RecognitionEvent::Final("still here".into()),
        ])]);
        let mut h = spawn_listener(test_config(), recognizer);

        h.flag_tx.send(true).unwrap();

        assert_eq!(h.update_rx.recv().await.unwrap().text, "still here");
        let st = h.state.lock().unwrap();
        assert_eq!(st.mode, SessionMode::LiveActive);
        assert_eq!(st.attempt_count, 1);
    }

    /// Terminal errors skip the retry budget entirely.
    #[tokio::test(start_paused = true)]
    async fn terminal_error_falls_back_immediately() {
        let recognizer = FakeRecognizer::new(vec![StartScript::Emit(vec![
            RecognitionEvent::Error(RecognitionErrorKind::NotAllowed),
        ])]);
        let starts = Arc::clone(&recognizer.starts);
        let h = spawn_listener(test_config(), recognizer);

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::Simulated).await;

        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert!(h.state.lock().unwrap().error.contains("not-allowed"));
    }

    /// Simulation is sticky: no new live attempt within the session, but a
    /// stop/restart tries live capture again.
    #[tokio::test(start_paused = true)]
    async fn simulation_is_sticky_until_restart() {
        let recognizer = FakeRecognizer::new(vec![
            StartScript::Emit(vec![RecognitionEvent::Error(RecognitionErrorKind::Network)]),
            StartScript::Emit(vec![RecognitionEvent::Final("second life".into())]),
        ]);
        let starts = Arc::clone(&recognizer.starts);
        let mut h = spawn_listener(test_config(), recognizer);

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::Simulated).await;

        // Long after the fallback, still simulated and no second start.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(h.state.lock().unwrap().mode, SessionMode::Simulated);
        assert_eq!(starts.load(Ordering::SeqCst), 1);

        // Restarting the session re-attempts live capture.
        h.flag_tx.send(false).unwrap();
        wait_for_mode(&h.state, SessionMode::Idle).await;
        h.flag_tx.send(true).unwrap();

        loop {
            let update = h.update_rx.recv().await.unwrap();
            if !update.simulated {
                assert_eq!(update.text, "second life");
                break;
            }
        }
        assert_eq!(starts.load(Ordering::SeqCst), 2);
        assert_eq!(h.state.lock().unwrap().mode, SessionMode::LiveActive);
    }

    /// Stop during simulation clears everything and silences the stream.
    #[tokio::test(start_paused = true)]
    async fn stop_tears_down_completely() {
        let mut h = spawn_listener(test_config(), Arc::new(UnsupportedRecognizer));

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::Simulated).await;
        let _ = h.update_rx.recv().await;

        h.flag_tx.send(false).unwrap();
        wait_for_mode(&h.state, SessionMode::Idle).await;

        {
            let st = h.state.lock().unwrap();
            assert!(st.transcript.is_empty());
            assert!(st.audio_context.is_empty());
            assert!(!st.is_recording);
            assert!(!st.is_simulated);
            assert_eq!(st.attempt_count, 0);
        }

        // Drain anything emitted before the stop, then expect silence.
        while h.update_rx.try_recv().is_ok() {}
        let silent = tokio::time::timeout(Duration::from_secs(20), h.update_rx.recv()).await;
        assert!(silent.is_err(), "update after stop: {silent:?}");
    }

    /// The script plays in order and loops back to the start.
    #[tokio::test(start_paused = true)]
    async fn simulation_script_loops_in_order() {
        let config = ListenerConfig {
            simulation_script: vec!["one".into(), "two".into()],
            ..ListenerConfig::default()
        };
        let mut h = spawn_listener(config, Arc::new(UnsupportedRecognizer));

        h.flag_tx.send(true).unwrap();

        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(h.update_rx.recv().await.unwrap().text);
        }
        assert_eq!(seen, ["one", "two", "one", "two", "one"]);
    }

    /// The capture handle is released when the host stops listening.
    #[tokio::test(start_paused = true)]
    async fn stop_releases_the_capture_handle() {
        let recognizer = FakeRecognizer::new(vec![StartScript::Emit(vec![])]);
        let alive = Arc::clone(&recognizer.handles_alive);
        let h = spawn_listener(test_config(), recognizer);

        h.flag_tx.send(true).unwrap();
        wait_for_mode(&h.state, SessionMode::LiveActive).await;
        assert_eq!(alive.load(Ordering::SeqCst), 1);

        h.flag_tx.send(false).unwrap();
        wait_for_mode(&h.state, SessionMode::Idle).await;
        assert_eq!(alive.load(Ordering::SeqCst), 0);
    }
}
