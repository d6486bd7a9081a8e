//! Maps a voice transcript to a game command.
//!
//! Matching is plain case-insensitive substring containment over fixed
//! keyword sets, checked in priority order. The first set with a hit wins,
//! so "option two" is an options request rather than an answer.

use crate::question::AnswerIndex;

/// A command recognised in a voice transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    Question,
    Options,
    Help,
    Answer(AnswerIndex),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Command not recognized. Try again.")]
pub struct UnrecognizedCommand;

const QUESTION_KEYWORDS: &[&str] = &["question", "ask"];
const OPTIONS_KEYWORDS: &[&str] = &["option", "choices", "answers"];
const HELP_KEYWORDS: &[&str] = &["help", "instruction"];
const ANSWER_KEYWORDS: [&[&str]; 4] = [
    &["one", "first", "1"],
    &["two", "second", "2"],
    &["three", "third", "3"],
    &["four", "fourth", "4"],
];

/// What the player can say, shown next to the question.
pub const VOICE_HINTS: &[(&str, &str)] = &[
    ("question", "to hear the question"),
    ("options", "to hear the choices"),
    ("help", "for instructions"),
    ("one/two/three/four", "to select answer"),
];

pub fn interpret(transcript: &str) -> Result<VoiceCommand, UnrecognizedCommand> {
    let transcript = transcript.trim().to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| transcript.contains(k));

    if mentions(QUESTION_KEYWORDS) {
        return Ok(VoiceCommand::Question);
    }
    if mentions(OPTIONS_KEYWORDS) {
        return Ok(VoiceCommand::Options);
    }
    if mentions(HELP_KEYWORDS) {
        return Ok(VoiceCommand::Help);
    }

    for (keywords, index) in ANSWER_KEYWORDS.into_iter().zip(AnswerIndex::ALL) {
        if mentions(keywords) {
            return Ok(VoiceCommand::Answer(index));
        }
    }

    Err(UnrecognizedCommand)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(n: usize) -> VoiceCommand {
        VoiceCommand::Answer(AnswerIndex::new(n).unwrap())
    }

    #[test]
    fn repeat_the_question_is_a_question_request() {
        assert_eq!(interpret("please repeat the question"), Ok(VoiceCommand::Question));
        assert_eq!(interpret("Ask me again"), Ok(VoiceCommand::Question));
    }

    #[test]
    fn options_keyword_wins_over_answer_number() {
        assert_eq!(interpret("option two please"), Ok(VoiceCommand::Options));
        assert_eq!(interpret("read the choices"), Ok(VoiceCommand::Options));
    }

    #[test]
    fn help_is_checked_after_options() {
        assert_eq!(interpret("HELP"), Ok(VoiceCommand::Help));
        assert_eq!(interpret("instructions and answers"), Ok(VoiceCommand::Options));
    }

    #[test]
    fn answer_numbers_are_matched_in_order() {
        assert_eq!(interpret("the first one"), Ok(answer(0)));
        assert_eq!(interpret("two"), Ok(answer(1)));
        assert_eq!(interpret("number 3"), Ok(answer(2)));
        assert_eq!(interpret("  Fourth  "), Ok(answer(3)));
        // "one" is checked before "two".
        assert_eq!(interpret("two or one"), Ok(answer(0)));
    }

    #[test]
    fn unknown_transcript_is_unrecognized() {
        assert_eq!(interpret("xyz"), Err(UnrecognizedCommand));
        assert_eq!(interpret(""), Err(UnrecognizedCommand));
        assert_eq!(
            UnrecognizedCommand.to_string(),
            "Command not recognized. Try again."
        );
    }
}
