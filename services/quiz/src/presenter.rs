use quiz_core::interpreter::VOICE_HINTS;
use quiz_core::ports::Presenter;
use quiz_core::question::AnswerIndex;
use quiz_core::screen::Screen;
use std::io::Write;
use std::time::Duration;

/// Text for one screen, as printed to the terminal.
pub fn render_screen(screen: &Screen) -> String {
    match screen {
        Screen::Locked => "🔒 Enter the PIN to add questions: pin <PIN>\n".to_string(),
        Screen::Authoring { stored } => {
            let noun = if *stored == 1 { "question" } else { "questions" };
            format!(
                "✏️  Question authoring ({stored} {noun} stored)\n   \
                 add <question> | <option 1> | <option 2> | <option 3> | <option 4> | <answer 1-4>\n   \
                 start\n"
            )
        }
        Screen::Instructions => "🎧 Audio Knowledge Journey\n   \
             Press Enter on an empty line to start.\n   \
             q question, o options, h help, 1-4 answer, v voice\n"
            .to_string(),
        Screen::Question(view) => {
            let mut text = format!(
                "Level {} · Question {} of {}\n❓ {}\n",
                view.level, view.number, view.total, view.text
            );
            for (index, option) in AnswerIndex::ALL.iter().zip(&view.options) {
                text.push_str(&format!("   {index}. {option}\n"));
            }
            text.push_str(&voice_hints());
            text.push('\n');
            text
        }
        Screen::Completed { level, completed } => format!(
            "🏁 Level {level} complete: {completed} answered.\n   \
             Press Enter to play again, or p to add questions.\n"
        ),
    }
}

fn voice_hints() -> String {
    let hints: Vec<String> = VOICE_HINTS
        .iter()
        .map(|(word, purpose)| format!("\"{word}\" {purpose}"))
        .collect();
    format!("🎤 Say: {}", hints.join(", "))
}

/// Prints screens, marks, toasts and transcript echoes as plain lines.
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn print(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write to terminal: {:?}", e);
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn render(&mut self, screen: &Screen) {
        let text = render_screen(screen);
        self.print(&format!("\n{text}"));
    }

    fn mark_option(&mut self, index: AnswerIndex, correct: bool) {
        let mark = if correct { "✅" } else { "❌" };
        self.print(&format!("{mark} Option {index}\n"));
    }

    fn toast(&mut self, message: &str, duration: Duration) {
        tracing::debug!(?duration, "showing toast");
        self.print(&format!("ℹ️  {message}\n"));
    }

    fn heard(&mut self, transcript: &str) {
        self.print(&format!("🎤 You said: \"{transcript}\"\n"));
    }
}
