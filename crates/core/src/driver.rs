use crate::ports::{Presenter, SpeechInput, SpeechOutput};
use crate::session::QuizSession;
use crate::voice::{RecognitionError, VoiceEvent};
use crate::{Action, Effect};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs a `QuizSession` against its ports.
///
/// The driver is the single writer of session state: actions are taken off
/// one queue and each is handled to completion, effects included, before the
/// next. Deferred work (the advance timer, port completions) re-enters the
/// same queue. The driver only holds a weak handle on that queue, so `run`
/// ends once the host and every pending timer have dropped their senders.
pub struct QuizDriver<O, I, P> {
    session: QuizSession,
    speech_out: O,
    speech_in: I,
    presenter: P,
    actions: mpsc::WeakSender<Action>,
}

impl<O, I, P> QuizDriver<O, I, P>
where
    O: SpeechOutput,
    I: SpeechInput,
    P: Presenter,
{
    pub fn new(
        session: QuizSession,
        speech_out: O,
        speech_in: I,
        presenter: P,
        actions: &mpsc::Sender<Action>,
    ) -> Self {
        Self {
            session,
            speech_out,
            speech_in,
            presenter,
            actions: actions.downgrade(),
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Shows the opening screen.
    pub async fn open(&mut self) {
        let effects = self.session.open();
        self.execute(effects).await;
    }

    pub async fn dispatch(&mut self, action: Action) {
        let effects = self.session.handle(action);
        self.execute(effects).await;
    }

    /// Opens the session and processes actions until every sender is gone.
    pub async fn run(mut self, mut actions: mpsc::Receiver<Action>) -> QuizSession {
        self.open().await;
        while let Some(action) = actions.recv().await {
            self.dispatch(action).await;
        }
        tracing::info!("action queue closed, quiz driver stopping");
        self.session
    }

    /// Runs effects in order. Effects produced while applying one run after
    /// those already pending.
    async fn execute(&mut self, effects: Vec<Effect>) {
        let mut pending = VecDeque::from(effects);
        while let Some(effect) = pending.pop_front() {
            tracing::debug!(?effect, "executing effect");
            pending.extend(self.apply(effect).await);
        }
    }

    async fn apply(&mut self, effect: Effect) -> Vec<Effect> {
        match effect {
            Effect::Speak { id, text } => {
                if let Err(e) = self.speech_out.speak(id, text).await {
                    tracing::error!("Speech output failed: {:?}", e);
                    // Nothing will ever finish this utterance.
                    return self.session.handle(Action::SpeechFinished(id));
                }
            }
            Effect::Render(screen) => self.presenter.render(&screen),
            Effect::MarkOption { index, correct } => self.presenter.mark_option(index, correct),
            Effect::ScheduleAdvance(delay) => self.schedule(delay, Action::Advance),
            Effect::Toast { message, duration } => self.presenter.toast(&message, duration),
            Effect::Heard(transcript) => self.presenter.heard(&transcript),
            Effect::StartListening => {
                if let Err(e) = self.speech_in.listen().await {
                    tracing::warn!("Failed to start speech input: {:?}", e);
                    self.enqueue(Action::Voice(VoiceEvent::Error(RecognitionError::StartFailed)));
                }
            }
            Effect::StopListening => {
                if let Err(e) = self.speech_in.stop().await {
                    tracing::warn!("Failed to stop speech input: {:?}", e);
                }
            }
        }
        Vec::new()
    }

    /// Sends `action` back into the queue once `delay` has passed.
    fn schedule(&self, delay: Duration, action: Action) {
        let deadline = tokio::time::Instant::now() + delay;
        let Some(actions) = self.actions.upgrade() else {
            tracing::warn!("Action queue closed, dropping scheduled {:?}", action);
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if actions.send(action).await.is_err() {
                tracing::warn!("Action queue closed before a scheduled action fired");
            }
        });
    }

    fn enqueue(&self, action: Action) {
        let Some(actions) = self.actions.upgrade() else {
            tracing::warn!("Action queue closed, dropping {:?}", action);
            return;
        };
        if let Err(e) = actions.try_send(action) {
            tracing::warn!("Failed to enqueue action: {:?}", e);
        }
    }
}
