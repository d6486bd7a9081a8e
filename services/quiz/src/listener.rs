use anyhow::{Context, Result};
use async_trait::async_trait;
use quiz_core::ports::SpeechInput;
use quiz_core::voice::{RecognitionError, VoiceEvent};
use quiz_core::Action;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;

type Slot = Arc<Mutex<Option<oneshot::Sender<String>>>>;

/// Creates a listener and the handle the terminal uses to "speak" into it.
pub fn terminal_voice(
    listen_timeout: Duration,
    actions: &mpsc::Sender<Action>,
) -> (TerminalListener, UtteranceSender) {
    let slot: Slot = Arc::new(Mutex::new(None));
    let listener = TerminalListener {
        slot: slot.clone(),
        listen_timeout,
        actions: actions.downgrade(),
        capturing: Arc::new(AtomicBool::new(false)),
        task: None,
    };
    (listener, UtteranceSender { slot })
}

/// Delivers typed utterances to the listener while it is capturing.
#[derive(Clone)]
pub struct UtteranceSender {
    slot: Slot,
}

impl UtteranceSender {
    /// Returns `false` when nothing is listening; the utterance is dropped.
    pub async fn deliver(&self, utterance: String) -> bool {
        match self.slot.lock().await.take() {
            Some(tx) => tx.send(utterance).is_ok(),
            None => false,
        }
    }
}

/// A single-shot recogniser fed by typed lines instead of a microphone.
///
/// Each `listen` reports `Started`, then either the next delivered utterance
/// or `NoSpeech` once the timeout passes, then `Ended`.
///
/// `capturing` is cleared before `Ended` is reported, so a `listen` issued in
/// reaction to `Ended` always finds the listener idle. Whoever clears it
/// (the capture task or `stop`) is the one that reports `Ended`.
pub struct TerminalListener {
    slot: Slot,
    listen_timeout: Duration,
    actions: mpsc::WeakSender<Action>,
    capturing: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

#[async_trait]
impl SpeechInput for TerminalListener {
    async fn listen(&mut self) -> Result<()> {
        let actions = self.actions.upgrade().context("Action queue closed")?;
        if self.capturing.swap(true, Ordering::SeqCst) {
            anyhow::bail!("Already listening");
        }

        let (tx, rx) = oneshot::channel();
        *self.slot.lock().await = Some(tx);

        let listen_timeout = self.listen_timeout;
        let slot = self.slot.clone();
        let capturing = self.capturing.clone();
        self.task = Some(tokio::spawn(async move {
            let report = |event: VoiceEvent| {
                if let Err(e) = actions.try_send(Action::Voice(event)) {
                    tracing::warn!("Failed to report voice event: {:?}", e);
                }
            };

            report(VoiceEvent::Started);
            match tokio::time::timeout(listen_timeout, rx).await {
                Ok(Ok(transcript)) => {
                    tracing::debug!(%transcript, "utterance captured");
                    report(VoiceEvent::Transcript(transcript));
                }
                Ok(Err(_)) => tracing::debug!("listening cancelled"),
                Err(_) => {
                    slot.lock().await.take();
                    report(VoiceEvent::Error(RecognitionError::NoSpeech));
                }
            }
            if capturing.swap(false, Ordering::SeqCst) {
                report(VoiceEvent::Ended);
            }
        }));
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let was_capturing = self.capturing.swap(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.slot.lock().await.take();
        if !was_capturing {
            return Ok(());
        }
        let actions = self.actions.upgrade().context("Action queue closed")?;
        actions
            .try_send(Action::Voice(VoiceEvent::Ended))
            .context("Failed to report end of listening")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn next_event(rx: &mut mpsc::Receiver<Action>) -> VoiceEvent {
        match rx.recv().await {
            Some(Action::Voice(event)) => event,
            other => panic!("expected a voice event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn delivered_utterance_becomes_a_transcript() {
        // --- Arrange ---
        let (tx, mut rx) = mpsc::channel(8);
        let (mut listener, sender) = terminal_voice(Duration::from_secs(8), &tx);

        // --- Act ---
        listener.listen().await.unwrap();
        assert_eq!(next_event(&mut rx).await, VoiceEvent::Started);
        let delivered = sender.deliver("Option Two".to_string()).await;

        // --- Assert ---
        assert!(delivered);
        assert_eq!(next_event(&mut rx).await, VoiceEvent::Transcript("Option Two".to_string()));
        assert_eq!(next_event(&mut rx).await, VoiceEvent::Ended);
    }

    #[tokio::test]
    async fn utterance_is_dropped_when_not_listening() {
        let (tx, _rx) = mpsc::channel(8);
        let (_listener, sender) = terminal_voice(Duration::from_secs(8), &tx);

        assert!(!sender.deliver("question".to_string()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn silence_times_out_as_no_speech() {
        let (tx, mut rx) = mpsc::channel(8);
        let (mut listener, sender) = terminal_voice(Duration::from_secs(8), &tx);

        listener.listen().await.unwrap();

        assert_eq!(next_event(&mut rx).await, VoiceEvent::Started);
        assert_eq!(
            next_event(&mut rx).await,
            VoiceEvent::Error(RecognitionError::NoSpeech)
        );
        assert_eq!(next_event(&mut rx).await, VoiceEvent::Ended);
        assert!(!sender.deliver("too late".to_string()).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn listen_can_rearm_as_soon_as_ended_arrives() {
        // --- Arrange ---
        let (tx, mut rx) = mpsc::channel(8);
        let (mut listener, _sender) = terminal_voice(Duration::ZERO, &tx);

        // --- Act & Assert ---
        for round in 0..500 {
            listener
                .listen()
                .await
                .unwrap_or_else(|e| panic!("re-arm {round} failed: {e:?}"));
            while next_event(&mut rx).await != VoiceEvent::Ended {}
        }
    }

    #[tokio::test]
    async fn stop_ends_capture_without_a_transcript() {
        let (tx, mut rx) = mpsc::channel(8);
        let (mut listener, sender) = terminal_voice(Duration::from_secs(8), &tx);
        listener.listen().await.unwrap();
        assert_eq!(next_event(&mut rx).await, VoiceEvent::Started);

        listener.stop().await.unwrap();

        assert_eq!(next_event(&mut rx).await, VoiceEvent::Ended);
        assert!(!sender.deliver("help".to_string()).await);
        assert!(rx.try_recv().is_err());
    }
}
