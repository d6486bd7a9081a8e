use crate::Action;
use crate::question::AnswerIndex;

/// Keyboard shortcuts. Pointer controls map onto the same actions.
pub fn action_for_key(key: char) -> Option<Action> {
    let action = match key.to_ascii_lowercase() {
        ' ' => Action::Begin,
        'q' => Action::RequestQuestion,
        'o' => Action::RequestOptions,
        'h' => Action::RequestHelp,
        'p' => Action::GoToAuthoring,
        'v' => Action::ToggleVoice,
        digit @ '1'..='4' => {
            let index = digit as usize - '1' as usize;
            Action::SubmitAnswer(AnswerIndex::new(index).ok()?)
        }
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_zero_based_answers() {
        assert_eq!(
            action_for_key('1'),
            Some(Action::SubmitAnswer(AnswerIndex::new(0).unwrap()))
        );
        assert_eq!(
            action_for_key('4'),
            Some(Action::SubmitAnswer(AnswerIndex::new(3).unwrap()))
        );
        assert_eq!(action_for_key('5'), None);
        assert_eq!(action_for_key('0'), None);
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(action_for_key('Q'), Some(Action::RequestQuestion));
        assert_eq!(action_for_key('o'), Some(Action::RequestOptions));
        assert_eq!(action_for_key('H'), Some(Action::RequestHelp));
        assert_eq!(action_for_key('p'), Some(Action::GoToAuthoring));
        assert_eq!(action_for_key(' '), Some(Action::Begin));
        assert_eq!(action_for_key('x'), None);
    }
}
