//! Console demo — voice-listener.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] and the command table from disk (defaults on first
//!    run).
//! 3. Pick the recognizer: a Whisper model on disk enables live capture,
//!    otherwise the session runs on the simulation script.
//! 4. Spawn the [`AudioListener`] actor and the command-matching task.
//! 5. Read stdin for `start` / `stop` / `status` / `commands` / `quit`.
//!
//! The matcher task also honours the spoken "stop listening" command by
//! flipping the same watch flag the console `stop` uses.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use voice_listener::{
    commands::{CommandAction, CommandCategory, CommandMatcher, CommandTable, VoiceCommand},
    config::{AppConfig, AppPaths},
    listener::{new_shared_state, AudioListener, SharedListenerState, TranscriptUpdate},
    recognition::{LiveRecognizer, SpeechRecognizer, UnsupportedRecognizer},
    stt::WhisperEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths = AppPaths::new();
    let config = AppConfig::load()?;
    let table = CommandTable::load_from(&paths.commands_file)?;
    log::info!(
        "loaded config from {:?}, {} voice commands",
        paths.config_dir,
        table.commands.len()
    );

    let recognizer = build_recognizer(&config, &paths);

    let state = new_shared_state(recognizer.is_supported());
    let (update_tx, update_rx) = mpsc::channel::<TranscriptUpdate>(64);
    let (flag_tx, flag_rx) = watch::channel(false);

    let listener = AudioListener::new(
        config.listener.clone(),
        recognizer,
        Arc::clone(&state),
        update_tx,
    );
    tokio::spawn(listener.run(flag_rx));

    let commands = bind_commands(&table, &flag_tx);
    let matcher = CommandMatcher::new(&config.matcher);
    tokio::spawn(run_matcher(matcher, commands, update_rx, flag_tx.clone()));

    repl(state, table, flag_tx).await;
    Ok(())
}

/// Live recognition when a Whisper model is on disk, simulation otherwise.
fn build_recognizer(config: &AppConfig, paths: &AppPaths) -> Arc<dyn SpeechRecognizer> {
    let model_path = paths.models_dir.join(format!("{}.bin", config.stt.model));
    if !model_path.exists() {
        log::warn!(
            "no Whisper model at {model_path:?} - live capture disabled, \
             sessions will use the simulation script"
        );
        return Arc::new(UnsupportedRecognizer);
    }

    match WhisperEngine::load(&model_path, &config.stt.language) {
        Ok(engine) => Arc::new(LiveRecognizer::new(
            Arc::new(engine),
            config.stt.audio_device.clone(),
            config.stt.window_secs,
        )),
        Err(e) => {
            log::warn!("whisper init failed ({e}) - falling back to simulation");
            Arc::new(UnsupportedRecognizer)
        }
    }
}

/// Attach demo actions to the loaded command specs.  Most commands just
/// log; the microphone-off command flips the shared listening flag, so
/// saying "stop listening" works exactly like typing `stop`.
fn bind_commands(table: &CommandTable, flag_tx: &watch::Sender<bool>) -> Vec<VoiceCommand> {
    table
        .commands
        .iter()
        .cloned()
        .map(|spec| {
            let mic_off = spec.category == CommandCategory::Control
                && spec.phrases.iter().any(|p| p == "stop listening");

            let action: CommandAction = if mic_off {
                let tx = flag_tx.clone();
                Arc::new(move || {
                    let _ = tx.send(false);
                })
            } else {
                let description = spec.description.clone();
                Arc::new(move || log::info!("command action: {description}"))
            };

            VoiceCommand::from_spec(spec, action)
        })
        .collect()
}

/// Consume ordered transcript updates and run the matcher over them; the
/// flag doubles as the matcher's `is_listening` input, so stopping clears
/// its baseline and cooldowns.
async fn run_matcher(
    mut matcher: CommandMatcher,
    commands: Vec<VoiceCommand>,
    mut update_rx: mpsc::Receiver<TranscriptUpdate>,
    flag_tx: watch::Sender<bool>,
) {
    let mut flag_rx = flag_tx.subscribe();

    loop {
        tokio::select! {
            changed = flag_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                let _ = matcher.process("", *flag_rx.borrow_and_update(), &commands);
            }
            update = update_rx.recv() => {
                let Some(update) = update else { return };
                let listening = *flag_rx.borrow();
                let Some(hit) = matcher.process(&update.text, listening, &commands) else {
                    continue;
                };

                let origin = if update.simulated { "simulated" } else { "live" };
                println!(
                    ">> command: {:?} [{}] - {} ({origin})",
                    hit.phrase, hit.category, hit.description
                );
            }
        }
    }
}

async fn repl(state: SharedListenerState, table: CommandTable, flag_tx: watch::Sender<bool>) {
    println!("voice-listener demo - start | stop | status | commands | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match line.trim() {
            "start" => {
                let _ = flag_tx.send(true);
                println!("listening on");
            }
            "stop" => {
                let _ = flag_tx.send(false);
                println!("listening off");
            }
            "status" => {
                let st = state.lock().unwrap();
                println!(
                    "{} | transcript: {:?} | context: {:?}",
                    st.mode.label(),
                    st.transcript,
                    st.audio_context
                );
                if !st.error.is_empty() {
                    println!("note: {}", st.error);
                }
            }
            "commands" => {
                for spec in &table.commands {
                    println!(
                        "[{}] {} - say: {}",
                        spec.category,
                        spec.description,
                        spec.phrases.join(", ")
                    );
                }
            }
            "quit" | "exit" => break,
            "" => {}
            other => println!("unknown command {other:?}"),
        }
    }

    let _ = flag_tx.send(false);
}
