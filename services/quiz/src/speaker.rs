use anyhow::{Context, Result};
use async_trait::async_trait;
use quiz_core::ports::SpeechOutput;
use quiz_core::{Action, UtteranceId};
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Words spoken per second at rate 1.0.
const WORDS_PER_SECOND: f32 = 2.5;

/// How long `text` takes to say at the given speech rate.
pub fn utterance_duration(text: &str, rate: f32) -> Duration {
    let words = text.split_whitespace().count().max(1);
    Duration::from_secs_f32(words as f32 / (WORDS_PER_SECOND * rate))
}

/// A speech output adapter that prints each utterance and reports it finished
/// once it would have been read aloud.
///
/// A new utterance cancels the one in flight, which is then reported finished
/// straight away.
pub struct TerminalSpeaker<W: Write + Send> {
    out: W,
    rate: f32,
    actions: mpsc::WeakSender<Action>,
    in_flight: Option<(UtteranceId, JoinHandle<()>)>,
}

impl<W: Write + Send> TerminalSpeaker<W> {
    pub fn new(out: W, rate: f32, actions: &mpsc::Sender<Action>) -> Self {
        Self {
            out,
            rate,
            actions: actions.downgrade(),
            in_flight: None,
        }
    }

    fn cancel(&mut self, actions: &mpsc::Sender<Action>) {
        let Some((id, task)) = self.in_flight.take() else {
            return;
        };
        if task.is_finished() {
            return;
        }
        task.abort();
        tracing::debug!(?id, "utterance cancelled");
        if let Err(e) = actions.try_send(Action::SpeechFinished(id)) {
            tracing::warn!("Failed to report cancelled utterance: {:?}", e);
        }
    }
}

#[async_trait]
impl<W: Write + Send> SpeechOutput for TerminalSpeaker<W> {
    async fn speak(&mut self, id: UtteranceId, text: String) -> Result<()> {
        let actions = self
            .actions
            .upgrade()
            .context("Action queue closed, nothing can hear the utterance finish")?;
        self.cancel(&actions);

        writeln!(self.out, "🔊 {text}").context("Failed to write utterance")?;
        self.out.flush().context("Failed to flush utterance")?;

        let duration = utterance_duration(&text, self.rate);
        tracing::debug!(?id, ?duration, "speaking");
        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if actions.send(Action::SpeechFinished(id)).await.is_err() {
                tracing::warn!("Action queue closed before utterance {:?} finished", id);
            }
        });
        self.in_flight = Some((id, task));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_scales_with_words_and_rate() {
        assert_eq!(utterance_duration("one two three four five", 1.0), Duration::from_secs(2));
        assert_eq!(utterance_duration("one two three four five", 2.0), Duration::from_secs(1));
        assert_eq!(utterance_duration("", 1.0), utterance_duration("word", 1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn utterance_finishes_after_its_duration() {
        // --- Arrange ---
        let (tx, mut rx) = mpsc::channel(8);
        let mut speaker = TerminalSpeaker::new(Vec::new(), 1.0, &tx);

        // --- Act ---
        speaker
            .speak(UtteranceId(1), "one two three four five".to_string())
            .await
            .unwrap();

        // --- Assert ---
        assert_eq!(String::from_utf8(speaker.out.clone()).unwrap(), "🔊 one two three four five\n");
        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(rx.recv().await, Some(Action::SpeechFinished(UtteranceId(1))));
    }

    #[tokio::test(start_paused = true)]
    async fn new_utterance_cancels_the_one_in_flight() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut speaker = TerminalSpeaker::new(Vec::new(), 1.0, &tx);

        speaker.speak(UtteranceId(1), "a long first sentence".to_string()).await.unwrap();
        speaker.speak(UtteranceId(2), "second".to_string()).await.unwrap();

        assert_eq!(rx.try_recv().unwrap(), Action::SpeechFinished(UtteranceId(1)));
        assert_eq!(rx.recv().await, Some(Action::SpeechFinished(UtteranceId(2))));

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err(), "cancelled utterance must finish only once");
    }

    #[tokio::test]
    async fn speaking_fails_once_the_queue_is_gone() {
        let (tx, rx) = mpsc::channel(8);
        let mut speaker = TerminalSpeaker::new(Vec::new(), 1.0, &tx);
        drop(tx);
        drop(rx);

        let result = speaker.speak(UtteranceId(1), "hello".to_string()).await;

        assert!(result.is_err());
        assert!(speaker.out.is_empty());
    }
}
