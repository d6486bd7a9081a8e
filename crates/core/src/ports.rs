use crate::question::AnswerIndex;
use crate::screen::Screen;
use crate::UtteranceId;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
#[cfg(test)]
use mockall::automock;

// The ports below are the only way the session reaches the outside world.
// Adapters for a terminal, a browser bridge or a test fake all plug in here
// and report back by sending `Action`s into the driver's queue.

/// Speech synthesis.
///
/// At most one utterance is in flight: calling `speak` again cancels the
/// current one. Each call reports exactly one `Action::SpeechFinished(id)`.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SpeechOutput: Send {
    async fn speak(&mut self, id: UtteranceId, text: String) -> Result<()>;
}

/// Single-shot speech recognition.
///
/// After `listen` the adapter reports `VoiceEvent::Started`, then a transcript
/// or an error, then `VoiceEvent::Ended`.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SpeechInput: Send {
    async fn listen(&mut self) -> Result<()>;

    async fn stop(&mut self) -> Result<()>;
}

/// Presentation adapter: screens, option marks, toasts and transcript echo.
#[cfg_attr(test, automock)]
pub trait Presenter: Send {
    fn render(&mut self, screen: &Screen);

    fn mark_option(&mut self, index: AnswerIndex, correct: bool);

    /// Shows a transient message which the adapter dismisses after `duration`.
    fn toast(&mut self, message: &str, duration: Duration);

    /// Echoes what the recogniser heard.
    fn heard(&mut self, transcript: &str);
}
