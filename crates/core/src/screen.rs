use crate::question::{OPTION_COUNT, Question};

/// Snapshot of what the presentation adapter should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// PIN entry in front of the question form.
    Locked,
    Authoring { stored: usize },
    Instructions,
    Question(QuestionView),
    Completed { level: u32, completed: usize },
}

/// The current question as the player sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub level: u32,
    /// 1-based position in the question set.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: [String; OPTION_COUNT],
}

impl QuestionView {
    pub fn new(question: &Question, level: u32, index: usize, total: usize) -> Self {
        Self {
            level,
            number: index + 1,
            total,
            text: question.text().to_string(),
            options: question.options().clone(),
        }
    }
}
