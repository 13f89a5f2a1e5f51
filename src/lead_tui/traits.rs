//! Core traits for the lead form TUI

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::lead_tui::app::Screen as ScreenType;

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Validate and deliver the lead
    Submit,
    /// Start a new requirement
    Reset,
    /// Show or hide the help popup
    ToggleHelp,
    /// Quit the application
    Quit,
    /// Set status message
    SetStatus(String),
    /// Warn about a refused action
    SetWarning(String),
    /// No action taken
    None,
}

/// Core trait for all TUI screens
pub trait Screen {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an action for the app
    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction;

    /// Get the screen type identifier
    fn screen_type(&self) -> ScreenType;

    /// Context help shown in the help popup
    fn help_text(&self) -> &'static str;
}

/// Trait for form handling
pub trait FormHandler {
    /// Get current field index
    fn get_current_field(&self) -> usize;

    /// Set current field
    fn set_current_field(&mut self, field: usize);

    /// Get total number of fields
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field((current + 1) % total);
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    /// Handle backspace for current field
    fn handle_backspace(&mut self);

    /// Handle delete for current field
    fn handle_delete(&mut self);

    /// Move the cursor within the current field
    fn handle_cursor(&mut self, movement: CursorMove);
}

/// Cursor movement inside a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Home,
    End,
}
