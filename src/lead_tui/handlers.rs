//! Common event handlers for the lead form TUI

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::traits::{CursorMove, FormHandler, ScreenAction};

/// Common keyboard event handling utilities
pub struct CommonKeyHandler;

impl CommonKeyHandler {
    /// Handle form navigation and input
    pub fn handle_form_keys<T: FormHandler>(form: &mut T, key: KeyEvent) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                Some(ScreenAction::None)
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.previous_field();
                Some(ScreenAction::None)
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                form.handle_char_input(c);
                Some(ScreenAction::None)
            }
            KeyCode::Backspace => {
                form.handle_backspace();
                Some(ScreenAction::None)
            }
            KeyCode::Delete => {
                form.handle_delete();
                Some(ScreenAction::None)
            }
            KeyCode::Left => {
                form.handle_cursor(CursorMove::Left);
                Some(ScreenAction::None)
            }
            KeyCode::Right => {
                form.handle_cursor(CursorMove::Right);
                Some(ScreenAction::None)
            }
            KeyCode::Home => {
                form.handle_cursor(CursorMove::Home);
                Some(ScreenAction::None)
            }
            KeyCode::End => {
                form.handle_cursor(CursorMove::End);
                Some(ScreenAction::None)
            }
            _ => None,
        }
    }

    /// Handle global application keys
    pub fn handle_global_keys(key: KeyEvent) -> Option<ScreenAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(ScreenAction::Quit),
            KeyCode::F(1) => Some(ScreenAction::ToggleHelp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        current: usize,
        text: String,
        moves: Vec<CursorMove>,
    }

    impl FormHandler for Recorder {
        fn get_current_field(&self) -> usize {
            self.current
        }

        fn set_current_field(&mut self, field: usize) {
            self.current = field;
        }

        fn get_field_count(&self) -> usize {
            3
        }

        fn handle_char_input(&mut self, c: char) {
            self.text.push(c);
        }

        fn handle_backspace(&mut self) {
            self.text.pop();
        }

        fn handle_delete(&mut self) {}

        fn handle_cursor(&mut self, movement: CursorMove) {
            self.moves.push(movement);
        }
    }

    #[test]
    fn test_form_navigation_wraps() {
        let mut form = Recorder::default();
        CommonKeyHandler::handle_form_keys(&mut form, KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(form.current, 2);
        CommonKeyHandler::handle_form_keys(&mut form, KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(form.current, 0);
    }

    #[test]
    fn test_control_chars_are_not_typed() {
        let mut form = Recorder::default();
        let action = CommonKeyHandler::handle_form_keys(
            &mut form,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        assert_eq!(action, None);
        CommonKeyHandler::handle_form_keys(&mut form, KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT));
        assert_eq!(form.text, "S");
    }

    #[test]
    fn test_global_keys() {
        assert_eq!(
            CommonKeyHandler::handle_global_keys(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(ScreenAction::Quit)
        );
        assert_eq!(
            CommonKeyHandler::handle_global_keys(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            CommonKeyHandler::handle_global_keys(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)),
            Some(ScreenAction::ToggleHelp)
        );
    }
}
