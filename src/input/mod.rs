use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the focused widget can do with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Course list and testimonials
    Landing,
    Help,
    /// A focused text field inside a form
    TextEntry,
    /// A focused multiple-choice row
    ChoiceRow,
    /// Form waiting on delivery; only Esc gets through
    Pending,
    /// Form showing its success screen
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowHelp,
    CloseOverlay,
    CursorUp,
    CursorDown,
    OptionLeft,
    OptionRight,
    Confirm,
    Back,
    NextSlide,
    PrevSlide,
    OpenCallback,
    Insert(char),
    DeleteChar,
}

pub fn map_key(key: KeyEvent, context: InputContext) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Handle Control + Char
    if ctrl {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('b') if matches!(context, InputContext::TextEntry | InputContext::ChoiceRow) => {
                Some(Action::Back)
            }
            _ => None,
        };
    }

    match context {
        InputContext::Landing => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Action::ShowHelp),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Char('c') => Some(Action::OpenCallback),
            KeyCode::Right | KeyCode::Char(']') | KeyCode::Char('l') => Some(Action::NextSlide),
            KeyCode::Left | KeyCode::Char('[') | KeyCode::Char('h') => Some(Action::PrevSlide),
            _ => None,
        },
        InputContext::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) => {
                Some(Action::CloseOverlay)
            }
            _ => None,
        },
        InputContext::Pending => match key.code {
            KeyCode::Esc => Some(Action::CloseOverlay),
            _ => None,
        },
        InputContext::Passive => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::CloseOverlay),
            _ => None,
        },
        InputContext::TextEntry | InputContext::ChoiceRow => match key.code {
            KeyCode::Esc => Some(Action::CloseOverlay),
            KeyCode::Tab | KeyCode::Down => Some(Action::CursorDown),
            KeyCode::BackTab | KeyCode::Up => Some(Action::CursorUp),
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Left if context == InputContext::ChoiceRow => Some(Action::OptionLeft),
            KeyCode::Right if context == InputContext::ChoiceRow => Some(Action::OptionRight),
            KeyCode::Char(' ') if context == InputContext::ChoiceRow => Some(Action::OptionRight),
            KeyCode::Backspace if context == InputContext::TextEntry => Some(Action::DeleteChar),
            KeyCode::Char(c)
                if context == InputContext::TextEntry && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                Some(Action::Insert(c))
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_q_quits_everywhere() {
        for context in [
            InputContext::Landing,
            InputContext::Help,
            InputContext::TextEntry,
            InputContext::ChoiceRow,
            InputContext::Pending,
            InputContext::Passive,
        ] {
            assert_eq!(map_key(ctrl('q'), context), Some(Action::Quit));
        }
    }

    #[test]
    fn test_typing_q_in_a_field_is_text() {
        assert_eq!(
            map_key(key(KeyCode::Char('q')), InputContext::TextEntry),
            Some(Action::Insert('q'))
        );
        assert_eq!(map_key(key(KeyCode::Char('q')), InputContext::Landing), Some(Action::Quit));
    }

    #[test]
    fn test_shifted_chars_are_text() {
        let upper = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(map_key(upper, InputContext::TextEntry), Some(Action::Insert('A')));
    }

    #[test]
    fn test_choice_row_keys() {
        assert_eq!(map_key(key(KeyCode::Left), InputContext::ChoiceRow), Some(Action::OptionLeft));
        assert_eq!(map_key(key(KeyCode::Char(' ')), InputContext::ChoiceRow), Some(Action::OptionRight));
        assert_eq!(map_key(key(KeyCode::Char('x')), InputContext::ChoiceRow), None);
        assert_eq!(map_key(ctrl('b'), InputContext::ChoiceRow), Some(Action::Back));
    }

    #[test]
    fn test_back_only_inside_forms() {
        assert_eq!(map_key(ctrl('b'), InputContext::Landing), None);
        assert_eq!(map_key(ctrl('b'), InputContext::TextEntry), Some(Action::Back));
    }

    #[test]
    fn test_landing_navigation() {
        assert_eq!(map_key(key(KeyCode::Down), InputContext::Landing), Some(Action::CursorDown));
        assert_eq!(map_key(key(KeyCode::Char(']')), InputContext::Landing), Some(Action::NextSlide));
        assert_eq!(map_key(key(KeyCode::Char('c')), InputContext::Landing), Some(Action::OpenCallback));
        assert_eq!(map_key(key(KeyCode::Enter), InputContext::Landing), Some(Action::Confirm));
    }

    #[test]
    fn test_pending_ignores_enter() {
        assert_eq!(map_key(key(KeyCode::Enter), InputContext::Pending), None);
        assert_eq!(map_key(key(KeyCode::Esc), InputContext::Pending), Some(Action::CloseOverlay));
    }

    #[test]
    fn test_passive_closes() {
        assert_eq!(map_key(key(KeyCode::Enter), InputContext::Passive), Some(Action::CloseOverlay));
        assert_eq!(map_key(key(KeyCode::Char('a')), InputContext::Passive), None);
    }
}
