use crate::question::{AnswerIndex, OPTION_COUNT, Question};

pub const DEFAULT_PIN: &str = "0000";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthoringError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("correct answer must be a number from 1 to 4, got '{0}'")]
    InvalidAnswer(String),
}

/// Raw question form input, as typed by the author.
///
/// `correct_answer` is the 1-based option number exactly as entered; it is
/// only parsed by [`QuestionDraft::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: String,
}

const OPTION_FIELDS: [&str; OPTION_COUNT] = ["option1", "option2", "option3", "option4"];

impl QuestionDraft {
    /// Checks every field and builds the question. The draft itself is left
    /// as entered so the author can correct it.
    pub fn validate(&self) -> Result<Question, AuthoringError> {
        if self.text.trim().is_empty() {
            return Err(AuthoringError::MissingField("question-text"));
        }
        for (option, field) in self.options.iter().zip(OPTION_FIELDS) {
            if option.trim().is_empty() {
                return Err(AuthoringError::MissingField(field));
            }
        }

        let raw = self.correct_answer.trim();
        if raw.is_empty() {
            return Err(AuthoringError::MissingField("correct-answer"));
        }
        let correct = raw
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| AnswerIndex::new(i).ok())
            .ok_or_else(|| AuthoringError::InvalidAnswer(raw.to_string()))?;

        Ok(Question::new(self.text.trim(), self.options.clone(), correct))
    }
}

/// Spoken reply for a rejected draft.
pub fn rejection_message(error: &AuthoringError) -> &'static str {
    match error {
        AuthoringError::MissingField(_) => "Please fill in all fields",
        AuthoringError::InvalidAnswer(_) => "The correct answer must be a number from 1 to 4",
    }
}
