pub mod authoring;
pub mod driver;
pub mod interpreter;
pub mod keymap;
pub mod ports;
pub mod question;
pub mod screen;
pub mod session;
pub mod voice;

use crate::authoring::QuestionDraft;
use crate::interpreter::VoiceCommand;
use crate::question::AnswerIndex;
use crate::screen::Screen;
use crate::voice::VoiceEvent;
use std::time::Duration;

/// Delay between a correct answer and moving on, so the feedback is heard.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(2000);
/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Identifies one call to the speech output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UtteranceId(pub u64);

impl UtteranceId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A discrete intent fed into the `QuizSession`.
///
/// Keyboard, pointer and voice input all produce these, as do the deferred
/// timers and port completions, so every path shares the same guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Space: start from the instructions screen, or play again when completed.
    Begin,
    RequestQuestion,
    RequestOptions,
    RequestHelp,
    SubmitAnswer(AnswerIndex),
    /// Fired by the advance timer after a correct answer.
    Advance,
    Restart,
    GoToAuthoring,
    SubmitPin(String),
    AddQuestion(QuestionDraft),
    StartGame,
    /// The microphone control.
    ToggleVoice,
    /// Completion notification from the speech output port.
    SpeechFinished(UtteranceId),
    Voice(VoiceEvent),
}

impl From<VoiceCommand> for Action {
    fn from(command: VoiceCommand) -> Self {
        match command {
            VoiceCommand::Question => Action::RequestQuestion,
            VoiceCommand::Options => Action::RequestOptions,
            VoiceCommand::Help => Action::RequestHelp,
            VoiceCommand::Answer(index) => Action::SubmitAnswer(index),
        }
    }
}

/// Represents the side effects the session asks its host to carry out.
///
/// The session only decides; the driver executes these against the ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Speak { id: UtteranceId, text: String },
    Render(Screen),
    MarkOption { index: AnswerIndex, correct: bool },
    /// Send `Action::Advance` back into the queue after the delay.
    ScheduleAdvance(Duration),
    Toast { message: String, duration: Duration },
    /// Echo of a voice transcript.
    Heard(String),
    StartListening,
    StopListening,
}
