//! Lead capture form screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use tracing::{debug, warn};

use crate::{
    attachment::Attachment,
    controller::FormController,
    lead_tui::{
        app::Screen as ScreenType,
        components::{FormField, FormFieldType, TextCursor},
        handlers::CommonKeyHandler,
        traits::{CursorMove, FormHandler, Screen, ScreenAction},
        ui::{centered_rect, SelectableList, Styles},
    },
    models::{LeadField, ProductCategory, ProductField},
    schema::{word_count, ValidationPolicy, ADDITIONAL_INFO_LIMIT, MAX_PRODUCTS},
};

/// A focusable position on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSlot {
    Field(LeadField),
    Submit,
}

impl FormSlot {
    pub fn field_type(&self) -> FormFieldType {
        match self {
            FormSlot::Submit => FormFieldType::Button,
            FormSlot::Field(LeadField::Product(_, ProductField::ProductType)) => FormFieldType::Dropdown,
            FormSlot::Field(LeadField::ExpectedDeliveryDate) => FormFieldType::Date,
            FormSlot::Field(LeadField::File) => FormFieldType::File,
            FormSlot::Field(LeadField::AdditionalInfo) => FormFieldType::TextArea,
            FormSlot::Field(_) => FormFieldType::Text,
        }
    }

    pub fn product_index(&self) -> Option<usize> {
        match self {
            FormSlot::Field(LeadField::Product(index, _)) => Some(*index),
            _ => None,
        }
    }

    fn is_category(&self) -> bool {
        matches!(self, FormSlot::Field(LeadField::Product(_, ProductField::ProductType)))
    }
}

/// Form screen state; the draft itself lives in the controller
pub struct LeadFormScreen {
    pub controller: FormController,
    focused: FormSlot,
    cursor: TextCursor,
    dirty: bool,
    attachment_input: String,
    category_list: SelectableList<ProductCategory>,
    show_category_dropdown: bool,
    scroll: usize,
}

impl LeadFormScreen {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            controller: FormController::new(policy),
            focused: FormSlot::Field(LeadField::ContactName),
            cursor: TextCursor::default(),
            dirty: false,
            attachment_input: String::new(),
            category_list: SelectableList::new(ProductCategory::ALL.to_vec()),
            show_category_dropdown: false,
            scroll: 0,
        }
    }

    pub fn focused(&self) -> FormSlot {
        self.focused
    }

    pub fn attachment_input(&self) -> &str {
        &self.attachment_input
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.show_category_dropdown
    }

    /// Focusable slots in display order, derived from the current draft
    pub fn slots(&self) -> Vec<FormSlot> {
        let mut slots = vec![
            FormSlot::Field(LeadField::ContactName),
            FormSlot::Field(LeadField::Phone),
            FormSlot::Field(LeadField::Gstin),
        ];
        for (index, item) in self.controller.products().iter().enumerate() {
            slots.extend(
                item.visible_fields()
                    .into_iter()
                    .map(|field| FormSlot::Field(LeadField::Product(index, field))),
            );
        }
        slots.extend([
            FormSlot::Field(LeadField::DestinationLocation),
            FormSlot::Field(LeadField::ExpectedDeliveryDate),
            FormSlot::Field(LeadField::File),
            FormSlot::Field(LeadField::AdditionalInfo),
            FormSlot::Submit,
        ]);
        slots
    }

    /// Move focus to `slot`, finishing any pending edit of the current field
    pub fn focus(&mut self, slot: FormSlot) {
        if slot == self.focused {
            return;
        }
        self.blur();
        self.focused = slot;
        self.cursor = TextCursor::at_end(self.focused_value());
    }

    /// Apply pending edits of the focused field without moving focus
    pub fn commit_focused(&mut self) {
        self.blur();
    }

    fn blur(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let FormSlot::Field(field) = self.focused else {
            return;
        };
        match field {
            LeadField::ExpectedDeliveryDate => {
                let raw = self.controller.draft().expected_delivery_date.clone();
                self.controller.set_delivery_date(&raw);
            }
            LeadField::File => {
                self.load_attachment();
                return;
            }
            _ => {}
        }
        let messages = self.controller.validate_field(&field.path());
        if !messages.is_empty() {
            debug!("{} invalid: {}", field.path(), messages.join("; "));
        }
    }

    fn load_attachment(&mut self) {
        let input = self.attachment_input.trim().to_string();
        if input.is_empty() {
            self.controller.clear_file();
            return;
        }
        match Attachment::from_path(&input) {
            Ok(attachment) => {
                self.controller.set_file(attachment);
            }
            Err(e) => {
                warn!("Attachment rejected: {}", e);
                self.controller.clear_file();
                self.controller.set_field_error("file", e.to_string());
            }
        }
    }

    fn focused_value(&self) -> &str {
        match self.focused {
            FormSlot::Field(LeadField::File) => &self.attachment_input,
            FormSlot::Field(field) => self.controller.draft().text(field).unwrap_or(""),
            FormSlot::Submit => "",
        }
    }

    fn edit(&mut self, op: impl FnOnce(&mut TextCursor, &mut String)) {
        let target = match self.focused {
            FormSlot::Field(LeadField::File) => Some(&mut self.attachment_input),
            FormSlot::Field(field) => self
                .controller
                .draft_mut()
                .and_then(|draft| draft.text_mut(field)),
            FormSlot::Submit => None,
        };
        if let Some(value) = target {
            op(&mut self.cursor, value);
            self.dirty = true;
        }
    }

    fn ensure_focus_valid(&mut self) {
        let slots = self.slots();
        if !slots.contains(&self.focused) {
            self.focused = slots[0];
            self.cursor = TextCursor::at_end(self.focused_value());
        }
    }

    pub fn add_product(&mut self) -> ScreenAction {
        if !self.controller.add_product() {
            return ScreenAction::SetWarning(format!("Maximum {} products allowed", MAX_PRODUCTS));
        }
        let index = self.controller.products().len() - 1;
        self.focus(FormSlot::Field(LeadField::Product(index, ProductField::ProductType)));
        ScreenAction::SetStatus(format!("Product {} added", index + 1))
    }

    pub fn remove_focused_product(&mut self) -> ScreenAction {
        let Some(index) = self.focused.product_index() else {
            return ScreenAction::SetWarning("Move to a product to remove it".to_string());
        };
        if !self.controller.can_remove_product() {
            return ScreenAction::SetWarning("At least one product is required".to_string());
        }

        // Pending edits belong to the item being removed
        self.dirty = false;
        self.controller.remove_product(index);
        let next = index.min(self.controller.products().len() - 1);
        self.focused = FormSlot::Field(LeadField::Product(next, ProductField::ProductType));
        self.cursor = TextCursor::default();
        ScreenAction::SetStatus(format!("Product {} removed", index + 1))
    }

    /// Focus the first slot carrying a validation error
    pub fn focus_first_error(&mut self) {
        let errors = self.controller.errors();
        let first = self.slots().into_iter().find(|slot| match slot {
            FormSlot::Field(field) => errors.contains(&field.path()),
            FormSlot::Submit => false,
        });
        if let Some(slot) = first {
            self.focus(slot);
        }
    }

    /// Fresh draft and focus on the first field
    pub fn reset(&mut self) {
        self.controller.reset();
        self.attachment_input.clear();
        self.dirty = false;
        self.show_category_dropdown = false;
        self.scroll = 0;
        self.focused = FormSlot::Field(LeadField::ContactName);
        self.cursor = TextCursor::default();
        self.ensure_focus_valid();
    }

    fn open_dropdown(&mut self) {
        let Some(index) = self.focused.product_index() else {
            return;
        };
        let current = self.controller.products().get(index).and_then(|item| item.product_type);
        self.category_list.select_item(current.as_ref());
        self.show_category_dropdown = true;
    }

    fn handle_dropdown_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Up => self.category_list.previous(),
            KeyCode::Down => self.category_list.next(),
            KeyCode::Enter => {
                self.show_category_dropdown = false;
                let selection = (self.focused.product_index(), self.category_list.selected().copied());
                if let (Some(index), Some(category)) = selection {
                    self.controller.set_product_type(index, category);
                    return ScreenAction::SetStatus(format!("Product {}: {}", index + 1, category));
                }
            }
            KeyCode::Esc => self.show_category_dropdown = false,
            _ => {}
        }
        ScreenAction::None
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let header = Line::from(vec![
            Span::styled("STEELBAZAAR", Styles::title()),
            Span::raw("  Your Requirements  "),
            Span::styled(
                format!("Products {}/{}", self.controller.products().len(), MAX_PRODUCTS),
                Styles::info(),
            ),
        ]);
        let widget = Paragraph::new(header).block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, area);
    }

    fn draw_form(&mut self, f: &mut Frame, area: Rect) {
        let slots = self.slots();
        let focus_index = slots.iter().position(|slot| *slot == self.focused).unwrap_or(0);
        self.scroll = visible_start(&slots, self.scroll, focus_index, area.height);

        let mut y = area.y;
        for slot in &slots[self.scroll..] {
            let height = slot.field_type().height();
            if y + height > area.bottom() {
                break;
            }
            self.render_slot(f, *slot, Rect::new(area.x, y, area.width, height));
            y += height;
        }
    }

    fn render_slot(&self, f: &mut Frame, slot: FormSlot, area: Rect) {
        let focused = slot == self.focused;
        let cursor = if focused { self.cursor } else { TextCursor::default() };

        let FormSlot::Field(field) = slot else {
            FormField::new("Submit Requirements", FormFieldType::Button)
                .with_focus(focused, cursor)
                .render(f, area);
            return;
        };

        let path = field.path();
        let draft = self.controller.draft();
        let (label, value, hint) = match field {
            LeadField::Product(index, ProductField::ProductType) => {
                let value = draft
                    .products
                    .get(index)
                    .and_then(|item| item.product_type)
                    .map(|category| category.as_str())
                    .unwrap_or("");
                (
                    format!("Product {} - {}", index + 1, field.label()),
                    value,
                    Some("Enter to select".to_string()),
                )
            }
            LeadField::Product(index, _) => (
                format!("Product {} - {}", index + 1, field.label()),
                draft.text(field).unwrap_or(""),
                None,
            ),
            LeadField::File => (
                field.label().to_string(),
                self.attachment_input.as_str(),
                draft
                    .file
                    .as_ref()
                    .map(|file| format!("{}, {}", file.file_name, file.display_size())),
            ),
            LeadField::AdditionalInfo => (
                field.label().to_string(),
                draft.additional_info.as_str(),
                Some(format!(
                    "{}/{} words, {} chars",
                    word_count(&draft.additional_info),
                    ADDITIONAL_INFO_LIMIT,
                    draft.additional_info.chars().count()
                )),
            ),
            _ => (field.label().to_string(), draft.text(field).unwrap_or(""), None),
        };

        FormField::new(label, slot.field_type())
            .with_value(value)
            .with_placeholder(field.placeholder())
            .with_focus(focused, cursor)
            .with_error(self.controller.errors().first(&path))
            .with_hint(hint)
            .render(f, area);
    }

    fn draw_instructions(&self, f: &mut Frame, area: Rect) {
        let instructions = Paragraph::new(
            "Tab/↑↓: Move | Enter: Select/Submit | Ctrl+N: Add product | Ctrl+X: Remove product | Ctrl+S: Submit | F1: Help",
        )
        .style(Styles::info())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(instructions, area);
    }

    fn draw_category_dropdown(&mut self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(40, 50, area);

        let items: Vec<ListItem> = self
            .category_list
            .items
            .iter()
            .map(|category| ListItem::new(Line::from(Span::styled(category.as_str(), Style::default()))))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Select product category")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_widget(Clear, popup_area);
        f.render_stateful_widget(list, popup_area, &mut self.category_list.state);
    }
}

/// First slot to draw so that the focused slot fits into `available` rows
fn visible_start(slots: &[FormSlot], scroll: usize, focus: usize, available: u16) -> usize {
    let mut start = scroll.min(focus);
    while start < focus
        && slots[start..=focus]
            .iter()
            .map(|slot| slot.field_type().height())
            .sum::<u16>()
            > available
    {
        start += 1;
    }
    start
}

impl FormHandler for LeadFormScreen {
    fn get_current_field(&self) -> usize {
        self.slots()
            .iter()
            .position(|slot| *slot == self.focused)
            .unwrap_or(0)
    }

    fn set_current_field(&mut self, field: usize) {
        if let Some(slot) = self.slots().get(field).copied() {
            self.focus(slot);
        }
    }

    fn get_field_count(&self) -> usize {
        self.slots().len()
    }

    fn handle_char_input(&mut self, c: char) {
        if !self.focused.field_type().is_editable() {
            return;
        }
        self.edit(|cursor, value| cursor.insert_char(value, c));
    }

    fn handle_backspace(&mut self) {
        self.edit(|cursor, value| cursor.delete_char(value));
    }

    fn handle_delete(&mut self) {
        self.edit(|cursor, value| cursor.delete_char_forward(value));
    }

    fn handle_cursor(&mut self, movement: CursorMove) {
        let length_source = self.focused_value().to_string();
        match movement {
            CursorMove::Left => self.cursor.move_left(),
            CursorMove::Right => self.cursor.move_right(&length_source),
            CursorMove::Home => self.cursor.move_to_start(),
            CursorMove::End => self.cursor.move_to_end(&length_source),
        }
    }
}

impl Screen for LeadFormScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Form
                Constraint::Length(3), // Instructions
            ])
            .split(area);

        self.draw_header(f, chunks[0]);
        self.draw_form(f, chunks[1]);
        self.draw_instructions(f, chunks[2]);

        if self.show_category_dropdown {
            self.draw_category_dropdown(f, area);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if self.show_category_dropdown {
            return self.handle_dropdown_key(key);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('n') if ctrl => return self.add_product(),
            KeyCode::Char('x') if ctrl => return self.remove_focused_product(),
            KeyCode::Char('s') if ctrl => {
                self.commit_focused();
                return ScreenAction::Submit;
            }
            KeyCode::Enter => {
                match self.focused {
                    FormSlot::Submit => {
                        self.commit_focused();
                        return ScreenAction::Submit;
                    }
                    slot if slot.is_category() => self.open_dropdown(),
                    _ => self.next_field(),
                }
                return ScreenAction::None;
            }
            KeyCode::Char(' ') if self.focused.is_category() => {
                self.open_dropdown();
                return ScreenAction::None;
            }
            _ => {}
        }

        CommonKeyHandler::handle_form_keys(self, key).unwrap_or(ScreenAction::None)
    }

    fn screen_type(&self) -> ScreenType {
        ScreenType::Form
    }

    fn help_text(&self) -> &'static str {
        "Lead Form:\n\
        Tab / Down - Next field\n\
        Shift+Tab / Up - Previous field\n\
        Enter - Open category list / Submit on the button\n\
        Ctrl+N - Add product (max 5)\n\
        Ctrl+X - Remove focused product\n\
        Ctrl+S - Submit requirements\n\
        Delivery date: type YYYY-MM-DD, it is shown as DD-MM-YYYY\n\
        Upload: type a file path (PDF, DOC, DOCX, JPG, JPEG, PNG, max. 5MB)"
    }
}
