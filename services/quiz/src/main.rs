use anyhow::{Context, Result};
use clap::Parser;
use quiz_core::Action;
use quiz_core::driver::QuizDriver;
use quiz_core::question::QuestionStore;
use quiz_core::session::QuizSession;
use quiz_core::voice::{InputUnavailable, VoiceEvent};
use quiz_service::config::Config;
use quiz_service::listener::{UtteranceSender, terminal_voice};
use quiz_service::presenter::TerminalPresenter;
use quiz_service::question_loader;
use quiz_service::speaker::TerminalSpeaker;
use quiz_service::terminal::{TerminalInput, parse_line};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "An audio multiple-choice quiz for the terminal")]
struct Cli {
    /// A JSON question file, or a directory of them
    #[arg(long)]
    questions: Option<PathBuf>,

    /// Keyboard only; never capture speech
    #[arg(long)]
    no_voice: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    // Logs go to stderr so they never interleave with the quiz on stdout.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Configuration loaded successfully. Starting audio quiz...");

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();
    let questions = args.questions.or(config.questions.clone());
    let voice_enabled = config.voice_enabled && !args.no_voice;

    // --- 4. Load Questions ---
    let store = match &questions {
        Some(path) => question_loader::load_questions(path)
            .with_context(|| format!("Failed to load questions from {}", path.display()))?,
        None => QuestionStore::new(),
    };
    tracing::info!("Loaded {} questions.", store.len());

    // --- 5. Application Setup ---
    let (action_tx, action_rx) = mpsc::channel::<Action>(64);

    let speaker = TerminalSpeaker::new(std::io::stdout(), config.speech_rate, &action_tx);
    let (listener, utterances) = terminal_voice(config.listen_timeout, &action_tx);
    let presenter = TerminalPresenter::new(std::io::stdout());
    let session = QuizSession::new(store).with_pin(config.authoring_pin.clone());
    let driver = QuizDriver::new(session, speaker, listener, presenter, &action_tx);

    if !voice_enabled {
        tracing::info!("Voice control disabled.");
        action_tx
            .send(Action::Voice(VoiceEvent::Unavailable(InputUnavailable::Unsupported)))
            .await
            .context("Failed to disable voice control")?;
    }

    let driver_handle = tokio::spawn(driver.run(action_rx));
    // The stdin task owns the only long-lived sender; the driver stops once it ends.
    let input_handle = tokio::spawn(read_terminal(action_tx, utterances));

    tokio::select! {
        result = driver_handle => {
            let session = result.context("Quiz driver task failed")?;
            tracing::info!("Quiz ended at level {} with {} questions stored.", session.level(), session.store().len());
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, shutting down...");
            input_handle.abort();
        }
    }
    tracing::info!("Shutting down...");
    Ok(())
}

/// Reads stdin line by line and feeds the action queue until end of input.
async fn read_terminal(actions: mpsc::Sender<Action>, utterances: UtteranceSender) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read from stdin: {:?}", e);
                break;
            }
        };
        match parse_line(&line) {
            TerminalInput::Action(action) => {
                if actions.send(action).await.is_err() {
                    tracing::warn!("Action queue closed, stopping terminal input.");
                    break;
                }
            }
            TerminalInput::Utterance(words) => {
                if !utterances.deliver(words).await {
                    println!("(not listening, press v to turn on the microphone)");
                }
            }
            TerminalInput::Malformed(reason) => println!("{reason}"),
            TerminalInput::Unknown(input) => {
                tracing::debug!(%input, "unrecognised terminal input");
                println!("Unknown input '{input}'. Keys: space q o h 1-4 v p, or: say <words>");
            }
        }
    }
    tracing::info!("Terminal input closed.");
}
