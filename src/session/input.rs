use crate::engine::letters;
use crate::session::typing::TypingState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CharStatus {
    Correct,
    Incorrect(char),
}

/// Records one typed character against the next expected one. Returns
/// whether it matched, or `None` once the text is complete.
pub fn process_char(state: &mut TypingState, ch: char) -> Option<bool> {
    if state.is_complete() {
        return None;
    }

    let ch = letters::normalize_char(ch);
    let expected = state.target[state.cursor];
    let correct = ch == expected;

    if correct {
        state.input.push(CharStatus::Correct);
    } else {
        state.input.push(CharStatus::Incorrect(ch));
        state.typo_flags.insert(state.cursor);
    }
    state.cursor += 1;

    Some(correct)
}

pub fn process_backspace(state: &mut TypingState) {
    if state.cursor > 0 {
        state.cursor -= 1;
        state.input.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_geresh_matches_apostrophe() {
        let mut state = TypingState::new("ג'");
        assert_eq!(process_char(&mut state, 'ג'), Some(true));
        assert_eq!(process_char(&mut state, letters::MAC_GERESH), Some(true));
        assert!(state.is_complete());
        assert_eq!(process_char(&mut state, 'x'), None);
    }

    #[test]
    fn wrong_char_is_recorded() {
        let mut state = TypingState::new("כ");
        assert_eq!(process_char(&mut state, 'ך'), Some(false));
        assert_eq!(state.input, vec![CharStatus::Incorrect('ך')]);
        assert!(state.typo_flags.contains(&0));
    }

    #[test]
    fn backspace_at_start_is_no_op() {
        let mut state = TypingState::new("כ");
        process_backspace(&mut state);
        assert_eq!(state.cursor, 0);
        assert!(state.input.is_empty());
    }
}
