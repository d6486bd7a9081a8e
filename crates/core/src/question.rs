use std::fmt;
use std::sync::Arc;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// A validated, 0-based index into a question's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerIndex(usize);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("answer index {0} is out of range (expected 0 to 3)")]
pub struct AnswerIndexError(pub usize);

impl AnswerIndex {
    pub const ALL: [AnswerIndex; OPTION_COUNT] =
        [AnswerIndex(0), AnswerIndex(1), AnswerIndex(2), AnswerIndex(3)];

    pub fn new(index: usize) -> Result<Self, AnswerIndexError> {
        if index < OPTION_COUNT {
            Ok(Self(index))
        } else {
            Err(AnswerIndexError(index))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// The 1-based number spoken and shown to the player.
    pub fn number(self) -> usize {
        self.0 + 1
    }
}

impl TryFrom<usize> for AnswerIndex {
    type Error = AnswerIndexError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnswerIndex> for usize {
    fn from(index: AnswerIndex) -> Self {
        index.0
    }
}

impl fmt::Display for AnswerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A multiple-choice question. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct: AnswerIndex,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct: AnswerIndex,
    ) -> Self {
        Self {
            text: text.into(),
            options,
            correct,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct(&self) -> AnswerIndex {
        self.correct
    }

    pub fn is_correct(&self, index: AnswerIndex) -> bool {
        self.correct == index
    }
}

/// Ordered, append-only in-memory question list.
///
/// The store is owned by whoever hosts the game and handed to the session at
/// construction; its contents outlive restarts.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Arc<Question>>,
}

impl QuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: Question) {
        self.questions.push(Arc::new(question));
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Question>> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Question>> {
        self.questions.iter()
    }
}

impl FromIterator<Question> for QuestionStore {
    fn from_iter<T: IntoIterator<Item = Question>>(iter: T) -> Self {
        Self {
            questions: iter.into_iter().map(Arc::new).collect(),
        }
    }
}
