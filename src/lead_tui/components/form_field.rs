//! Form field component for user input
//!
//! Field values live in the form controller's draft; this component only
//! edits them through [`TextCursor`] and renders them.

use ratatui::{
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::lead_tui::ui::Styles;

/// Type of form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormFieldType {
    Text,
    Date,
    Dropdown,
    File,
    TextArea,
    Button,
}

impl FormFieldType {
    /// Rows taken by a field of this type, borders included
    pub fn height(&self) -> u16 {
        match self {
            FormFieldType::TextArea => 6,
            _ => 3,
        }
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self, FormFieldType::Dropdown | FormFieldType::Button)
    }
}

/// Cursor inside a text value, counted in chars
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCursor {
    pub position: usize,
}

impl TextCursor {
    pub fn at_end(value: &str) -> Self {
        Self {
            position: value.chars().count(),
        }
    }

    fn byte_index(value: &str, position: usize) -> usize {
        value
            .char_indices()
            .nth(position)
            .map(|(index, _)| index)
            .unwrap_or(value.len())
    }

    fn clamp(&mut self, value: &str) {
        self.position = self.position.min(value.chars().count());
    }

    pub fn insert_char(&mut self, value: &mut String, c: char) {
        self.clamp(value);
        value.insert(Self::byte_index(value, self.position), c);
        self.position += 1;
    }

    pub fn delete_char(&mut self, value: &mut String) {
        self.clamp(value);
        if self.position > 0 {
            self.position -= 1;
            value.remove(Self::byte_index(value, self.position));
        }
    }

    pub fn delete_char_forward(&mut self, value: &mut String) {
        self.clamp(value);
        if self.position < value.chars().count() {
            value.remove(Self::byte_index(value, self.position));
        }
    }

    pub fn move_left(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn move_right(&mut self, value: &str) {
        if self.position < value.chars().count() {
            self.position += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.position = 0;
    }

    pub fn move_to_end(&mut self, value: &str) {
        self.position = value.chars().count();
    }

    /// Display column of the cursor
    pub fn column(&self, value: &str) -> usize {
        value[..Self::byte_index(value, self.position)].width()
    }
}

/// Individual form field view
#[derive(Debug, Clone)]
pub struct FormField<'a> {
    pub label: String,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub field_type: FormFieldType,
    pub is_focused: bool,
    pub cursor: TextCursor,
    pub validation_error: Option<&'a str>,
    pub hint: Option<String>,
}

impl<'a> FormField<'a> {
    pub fn new(label: impl Into<String>, field_type: FormFieldType) -> Self {
        Self {
            label: label.into(),
            value: "",
            placeholder: "",
            field_type,
            is_focused: false,
            cursor: TextCursor::default(),
            validation_error: None,
            hint: None,
        }
    }

    pub fn with_value(mut self, value: &'a str) -> Self {
        self.value = value;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_focus(mut self, focused: bool, cursor: TextCursor) -> Self {
        self.is_focused = focused;
        self.cursor = cursor;
        self
    }

    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.validation_error = error;
        self
    }

    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    pub fn height(&self) -> u16 {
        self.field_type.height()
    }

    fn title(&self) -> String {
        let mut title = self.label.clone();
        if let Some(hint) = &self.hint {
            title.push_str(" (");
            title.push_str(hint);
            title.push(')');
        }
        if let Some(error) = self.validation_error {
            title.push_str(" - Error: ");
            title.push_str(error);
        }
        title
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        if self.field_type == FormFieldType::Button {
            self.render_button(f, area);
            return;
        }

        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner_width = area.width.saturating_sub(2) as usize;
        let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();

        let (lines, cursor_row, cursor_col) = if showing_placeholder {
            (vec![self.placeholder.to_string()], 0, 0)
        } else if self.field_type == FormFieldType::TextArea {
            wrap_with_cursor(self.value, self.cursor, inner_width)
        } else {
            let (visible, col) = scroll_to_cursor(self.value, self.cursor, inner_width);
            (vec![visible], 0, col)
        };

        let text_style = if showing_placeholder {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let paragraph = Paragraph::new(lines.join("\n"))
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        // Render cursor if focused and editable
        if self.is_focused && self.field_type.is_editable() {
            let cursor_x = area.x + 1 + cursor_col as u16;
            let cursor_y = area.y + 1 + cursor_row as u16;
            if cursor_x < area.right().saturating_sub(1) && cursor_y < area.bottom().saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }

    fn render_button(&self, f: &mut Frame, area: Rect) {
        let style = if self.is_focused {
            Styles::button()
        } else {
            Styles::inactive()
        };

        let button = Paragraph::new(format!("[ {} ]", self.label))
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(if self.is_focused {
                Styles::active_border()
            } else {
                Styles::inactive_border()
            }));

        f.render_widget(button, area);
    }
}

/// Tail of a single-line value that keeps the cursor inside `width`
fn scroll_to_cursor(value: &str, cursor: TextCursor, width: usize) -> (String, usize) {
    let column = cursor.column(value);
    if width == 0 || column < width {
        return (value.to_string(), column);
    }

    let mut skipped = 0;
    let mut chars = value.chars();
    while column - skipped >= width {
        match chars.next() {
            Some(c) => skipped += c.width().unwrap_or(0),
            None => break,
        }
    }
    (chars.collect(), column - skipped)
}

/// Break `value` into rows of at most `width` columns and locate the cursor
pub fn wrap_with_cursor(value: &str, cursor: TextCursor, width: usize) -> (Vec<String>, usize, usize) {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut row_width = 0;
    let mut cursor_pos = (0, 0);

    for (index, c) in value.chars().enumerate() {
        if index == cursor.position {
            cursor_pos = (rows.len() - 1, row_width);
        }
        let char_width = c.width().unwrap_or(0);
        if c == '\n' {
            rows.push(String::new());
            row_width = 0;
            continue;
        }
        if row_width + char_width > width {
            rows.push(String::new());
            row_width = 0;
            if index == cursor.position {
                cursor_pos = (rows.len() - 1, 0);
            }
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        row_width += char_width;
    }

    if cursor.position >= value.chars().count() {
        cursor_pos = if row_width >= width {
            (rows.len(), 0)
        } else {
            (rows.len() - 1, row_width)
        };
    }

    (rows, cursor_pos.0, cursor_pos.1)
}
