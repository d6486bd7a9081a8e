//! Line-based terminal input.
//!
//! A line is one key press (`q`, `3`, an empty line for space), a spoken
//! utterance (`say <words>`), or an authoring command (`pin`, `add`, `start`).

use quiz_core::Action;
use quiz_core::authoring::QuestionDraft;
use quiz_core::keymap::action_for_key;
use quiz_core::question::OPTION_COUNT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalInput {
    Action(Action),
    /// Words for the speech input adapter.
    Utterance(String),
    /// A recognised command that cannot be used as typed.
    Malformed(String),
    Unknown(String),
}

/// Fields of an `add` line: the question text, the options and the answer.
const DRAFT_FIELDS: usize = OPTION_COUNT + 2;

pub fn parse_line(line: &str) -> TerminalInput {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return TerminalInput::Action(Action::Begin);
    }
    let trimmed = line.trim();

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };
    match command.to_lowercase().as_str() {
        "say" if !rest.is_empty() => TerminalInput::Utterance(rest.to_string()),
        "pin" => TerminalInput::Action(Action::SubmitPin(rest.to_string())),
        "add" => match parse_draft(rest) {
            Some(draft) => TerminalInput::Action(Action::AddQuestion(draft)),
            None => TerminalInput::Malformed(format!(
                "Too many fields: expected {DRAFT_FIELDS} separated by '|' \
                 (question, {OPTION_COUNT} options, answer)"
            )),
        },
        "start" if rest.is_empty() => TerminalInput::Action(Action::StartGame),
        "restart" if rest.is_empty() => TerminalInput::Action(Action::Restart),
        _ => {
            let mut chars = trimmed.chars();
            match (chars.next(), chars.next()) {
                (Some(key), None) => match action_for_key(key) {
                    Some(action) => TerminalInput::Action(action),
                    None => TerminalInput::Unknown(trimmed.to_string()),
                },
                _ => TerminalInput::Unknown(trimmed.to_string()),
            }
        }
    }
}

/// `text | option 1 | option 2 | option 3 | option 4 | answer`. Missing
/// fields are left empty for validation to report; extra fields reject the
/// whole line.
fn parse_draft(rest: &str) -> Option<QuestionDraft> {
    if rest.split('|').count() > DRAFT_FIELDS {
        return None;
    }
    let mut fields = rest.split('|').map(|field| field.trim().to_string());
    let mut draft = QuestionDraft {
        text: fields.next().unwrap_or_default(),
        ..QuestionDraft::default()
    };
    for slot in draft.options.iter_mut().take(OPTION_COUNT) {
        *slot = fields.next().unwrap_or_default();
    }
    draft.correct_answer = fields.next().unwrap_or_default();
    Some(draft)
}
