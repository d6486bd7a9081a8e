use crate::authoring::{self, DEFAULT_PIN, QuestionDraft};
use crate::interpreter;
use crate::question::{AnswerIndex, Question, QuestionStore};
use crate::screen::{QuestionView, Screen};
use crate::voice::{InputUnavailable, VoiceEvent};
use crate::{ADVANCE_DELAY, Action, Effect, TOAST_DURATION, UtteranceId};
use std::sync::Arc;

const TUTORIAL: &str = "Welcome to Audio Knowledge Journey! \
    This is an audio-based quiz game. \
    Press Space to start the tutorial. \
    You can use keyboard shortcuts to control the game: \
    Press Q to hear the question, \
    Press O to hear the options, \
    Press H for help, \
    And use number keys 1 to 4 to select your answer.";
const CORRECT: &str = "Correct! Well done!";
const INCORRECT: &str = "Incorrect. Try again!";
const QUESTION_ADDED: &str = "Question added successfully";
const NEED_QUESTIONS: &str = "Please add at least one question before starting the game";
const LISTENING: &str = "Listening... Speak your command";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// PIN entry in front of the question form.
    Locked,
    Authoring,
    Instructions,
    Playing,
    /// A correct answer was given; `Action::Advance` is on its way.
    AwaitingAdvance,
    Completed,
}

impl Phase {
    fn shows_question(self) -> bool {
        matches!(self, Phase::Playing | Phase::AwaitingAdvance)
    }
}

/// The quiz session state machine.
///
/// `handle` processes one action to completion and returns the effects for
/// the host to run. A rejected action returns no effects and leaves the state
/// untouched; nothing is queued for later.
pub struct QuizSession {
    store: QuestionStore,
    pin: String,
    phase: Phase,
    level: u32,
    question_index: usize,
    speaking: bool,
    last_utterance: UtteranceId,
    listening: bool,
    continuous_listening: bool,
    voice_disabled: Option<InputUnavailable>,
}

impl QuizSession {
    pub fn new(store: QuestionStore) -> Self {
        let phase = if store.is_empty() {
            Phase::Locked
        } else {
            Phase::Instructions
        };
        Self {
            store,
            pin: DEFAULT_PIN.to_string(),
            phase,
            level: 1,
            question_index: 0,
            speaking: false,
            last_utterance: UtteranceId::default(),
            listening: false,
            continuous_listening: false,
            voice_disabled: None,
        }
    }

    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = pin.into();
        self
    }

    /// Effects for the opening screen: the tutorial when questions exist,
    /// otherwise the PIN prompt.
    pub fn open(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Instructions => vec![Effect::Render(Screen::Instructions), self.speak(TUTORIAL)],
            _ => self.lock(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_continuous_listening(&self) -> bool {
        self.continuous_listening
    }

    pub fn voice_disabled(&self) -> Option<&InputUnavailable> {
        self.voice_disabled.as_ref()
    }

    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    /// Hands the store back, e.g. to start a fresh session over it.
    pub fn into_store(self) -> QuestionStore {
        self.store
    }

    pub fn current_question(&self) -> Option<&Arc<Question>> {
        self.store.get(self.question_index)
    }

    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        tracing::trace!(?action, phase = ?self.phase, speaking = self.speaking, "handling action");
        match action {
            Action::Begin => match self.phase {
                Phase::Instructions if self.speaking => rejected("begin while the tutorial is spoken"),
                Phase::Instructions => self.start(),
                Phase::Completed => self.restart(),
                _ => rejected("begin outside instructions or completed screen"),
            },
            Action::RequestQuestion => self.request_question(),
            Action::RequestOptions => self.request_options(),
            Action::RequestHelp => self.request_help(),
            Action::SubmitAnswer(index) => self.submit_answer(index),
            Action::Advance => self.advance(),
            Action::Restart => self.restart(),
            Action::GoToAuthoring => self.go_to_authoring(),
            Action::SubmitPin(pin) => self.submit_pin(&pin),
            Action::AddQuestion(draft) => self.add_question(&draft),
            Action::StartGame => self.start_game(),
            Action::ToggleVoice => self.toggle_voice(),
            Action::SpeechFinished(id) => {
                // Completions of superseded utterances are stale.
                if id == self.last_utterance {
                    self.speaking = false;
                }
                Vec::new()
            }
            Action::Voice(event) => self.on_voice(event),
        }
    }

    fn speak(&mut self, text: impl Into<String>) -> Effect {
        self.last_utterance = self.last_utterance.next();
        self.speaking = true;
        Effect::Speak {
            id: self.last_utterance,
            text: text.into(),
        }
    }

    fn toast(message: impl Into<String>) -> Effect {
        Effect::Toast {
            message: message.into(),
            duration: TOAST_DURATION,
        }
    }

    /// The current question, if question and option requests are allowed now.
    fn queryable_question(&self) -> Option<Arc<Question>> {
        if !self.phase.shows_question() || self.speaking {
            return None;
        }
        self.current_question().cloned()
    }

    fn question_screen(&self, question: &Question) -> Effect {
        Effect::Render(Screen::Question(QuestionView::new(
            question,
            self.level,
            self.question_index,
            self.store.len(),
        )))
    }

    fn start(&mut self) -> Vec<Effect> {
        let Some(question) = self.current_question().cloned() else {
            return rejected("no question to start with");
        };
        self.phase = Phase::Playing;
        tracing::info!(questions = self.store.len(), "game started");
        // One utterance; a second speak would cut the first one off.
        let intro = format!("{} {}", help_text(self.level), question_text(&question));
        vec![self.question_screen(&question), self.speak(intro)]
    }

    fn request_question(&mut self) -> Vec<Effect> {
        match self.queryable_question() {
            Some(question) => vec![self.speak(question_text(&question))],
            None => rejected("question request"),
        }
    }

    fn request_options(&mut self) -> Vec<Effect> {
        match self.queryable_question() {
            Some(question) => vec![self.speak(options_text(&question))],
            None => rejected("options request"),
        }
    }

    fn request_help(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Locked | Phase::Authoring => rejected("help outside the game"),
            _ => vec![self.speak(help_text(self.level))],
        }
    }

    fn submit_answer(&mut self, index: AnswerIndex) -> Vec<Effect> {
        if self.phase != Phase::Playing || self.speaking {
            return rejected("answer");
        }
        let Some(question) = self.current_question().cloned() else {
            return rejected("answer without a question");
        };

        let correct = question.is_correct(index);
        tracing::info!(answer = index.number(), correct, "answer submitted");
        let mut effects = vec![
            Effect::MarkOption { index, correct },
            self.speak(if correct { CORRECT } else { INCORRECT }),
        ];
        if correct {
            self.phase = Phase::AwaitingAdvance;
            effects.push(Effect::ScheduleAdvance(ADVANCE_DELAY));
        }
        effects
    }

    fn advance(&mut self) -> Vec<Effect> {
        if self.phase != Phase::AwaitingAdvance {
            return rejected("advance without a pending correct answer");
        }
        self.question_index += 1;

        match self.current_question().cloned() {
            Some(question) => {
                self.phase = Phase::Playing;
                vec![
                    self.question_screen(&question),
                    self.speak(question_text(&question)),
                ]
            }
            None => self.complete(),
        }
    }

    fn complete(&mut self) -> Vec<Effect> {
        self.phase = Phase::Completed;
        tracing::info!(completed = self.question_index, level = self.level, "all questions completed");

        let mut effects = Vec::new();
        self.continuous_listening = false;
        if self.listening {
            self.listening = false;
            effects.push(Effect::StopListening);
        }
        effects.push(Effect::Render(Screen::Completed {
            level: self.level,
            completed: self.question_index,
        }));
        effects.push(self.speak(summary_text(self.level, self.question_index)));
        effects
    }

    fn restart(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Completed {
            return rejected("restart before completion");
        }
        self.reset_progress();
        let Some(question) = self.current_question().cloned() else {
            return rejected("restart without questions");
        };
        self.phase = Phase::Playing;
        tracing::info!("game restarted");
        vec![
            self.question_screen(&question),
            self.speak(question_text(&question)),
        ]
    }

    fn reset_progress(&mut self) {
        self.level = 1;
        self.question_index = 0;
        self.speaking = false;
    }

    fn go_to_authoring(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Completed {
            return rejected("authoring outside the completed screen");
        }
        self.lock()
    }

    fn lock(&mut self) -> Vec<Effect> {
        self.phase = Phase::Locked;
        let prompt = format!("Welcome! Please enter PIN {} to add questions.", self.pin);
        vec![Effect::Render(Screen::Locked), self.speak(prompt)]
    }

    fn submit_pin(&mut self, pin: &str) -> Vec<Effect> {
        if self.phase != Phase::Locked {
            return rejected("PIN outside the PIN screen");
        }
        if pin.trim() == self.pin {
            self.phase = Phase::Authoring;
            vec![Effect::Render(Screen::Authoring {
                stored: self.store.len(),
            })]
        } else {
            tracing::warn!("invalid authoring PIN entered");
            let reply = format!("Invalid PIN. The PIN is {}.", self.pin);
            vec![self.speak(reply)]
        }
    }

    fn add_question(&mut self, draft: &QuestionDraft) -> Vec<Effect> {
        if self.phase != Phase::Authoring {
            return rejected("question outside the authoring form");
        }
        match draft.validate() {
            Ok(question) => {
                self.store.push(question);
                tracing::info!(stored = self.store.len(), "question added");
                vec![
                    Effect::Render(Screen::Authoring {
                        stored: self.store.len(),
                    }),
                    self.speak(QUESTION_ADDED),
                ]
            }
            Err(err) => {
                tracing::debug!(%err, "question draft rejected");
                vec![
                    Self::toast(err.to_string()),
                    self.speak(authoring::rejection_message(&err)),
                ]
            }
        }
    }

    fn start_game(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Authoring {
            return rejected("start outside the authoring form");
        }
        if self.store.is_empty() {
            return vec![self.speak(NEED_QUESTIONS)];
        }
        self.reset_progress();
        self.phase = Phase::Instructions;
        vec![Effect::Render(Screen::Instructions), self.speak(TUTORIAL)]
    }

    fn toggle_voice(&mut self) -> Vec<Effect> {
        if let Some(reason) = &self.voice_disabled {
            return vec![Self::toast(reason.to_string())];
        }
        if !self.phase.shows_question() {
            return rejected("voice control outside a question");
        }
        if self.listening {
            self.continuous_listening = false;
            vec![Effect::StopListening]
        } else {
            self.continuous_listening = true;
            self.arm()
        }
    }

    fn arm(&mut self) -> Vec<Effect> {
        if self.listening || self.voice_disabled.is_some() {
            return Vec::new();
        }
        self.listening = true;
        vec![Effect::StartListening]
    }

    fn on_voice(&mut self, event: VoiceEvent) -> Vec<Effect> {
        match event {
            VoiceEvent::Started => vec![Self::toast(LISTENING)],
            VoiceEvent::Transcript(transcript) => self.on_transcript(transcript),
            VoiceEvent::Error(err) => {
                tracing::warn!(%err, "recognition error");
                self.listening = false;
                vec![Self::toast(err.to_string())]
            }
            VoiceEvent::Ended => {
                self.listening = false;
                if self.continuous_listening {
                    self.arm()
                } else {
                    Vec::new()
                }
            }
            VoiceEvent::Unavailable(reason) => {
                tracing::warn!(%reason, "voice input disabled for this session");
                let mut effects = Vec::new();
                if self.listening {
                    effects.push(Effect::StopListening);
                }
                self.listening = false;
                self.continuous_listening = false;
                effects.push(Self::toast(reason.to_string()));
                self.voice_disabled = Some(reason);
                effects
            }
        }
    }

    fn on_transcript(&mut self, transcript: String) -> Vec<Effect> {
        if self.speaking || !self.phase.shows_question() {
            return rejected("transcript while speaking or off the question screen");
        }
        let transcript = transcript.trim().to_lowercase();
        tracing::info!(%transcript, "voice command received");

        let mut effects = vec![Effect::Heard(transcript.clone())];
        match interpreter::interpret(&transcript) {
            Ok(command) => effects.extend(self.handle(command.into())),
            Err(err) => effects.push(Self::toast(err.to_string())),
        }
        effects
    }
}

fn rejected(what: &str) -> Vec<Effect> {
    tracing::debug!("dropping {what}");
    Vec::new()
}

pub fn help_text(level: u32) -> String {
    format!(
        "You're on level {level}. \
         Press Q to hear the current question. \
         Press O to hear the answer options. \
         Use number keys 1 through 4 to select your answer. \
         Press H anytime to hear these instructions again."
    )
}

pub fn question_text(question: &Question) -> String {
    format!("Question: {}", question.text())
}

pub fn options_text(question: &Question) -> String {
    question
        .options()
        .iter()
        .zip(AnswerIndex::ALL)
        .map(|(option, index)| format!("Option {}: {option}", index.number()))
        .collect::<Vec<_>>()
        .join(". ")
}

pub fn summary_text(level: u32, completed: usize) -> String {
    let noun = if completed == 1 { "question" } else { "questions" };
    format!(
        "Congratulations! You've completed all questions in level {level}! \
         Your final score: {completed} {noun} completed. \
         Press Space to play again, or press P to add more questions."
    )
}
