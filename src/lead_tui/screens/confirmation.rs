//! Confirmation screen shown after a lead has been captured

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{
    intake::IntakeReceipt,
    lead_tui::{
        app::Screen as ScreenType,
        traits::{Screen, ScreenAction},
        ui::Styles,
    },
    models::Submission,
};

/// What the confirmation screen summarizes
#[derive(Debug, Clone)]
pub struct CaptureSummary {
    pub receipt: IntakeReceipt,
    pub contact_name: String,
    pub product_count: usize,
    pub destination: String,
}

#[derive(Debug, Default)]
pub struct ConfirmationScreen {
    pub summary: Option<CaptureSummary>,
}

impl ConfirmationScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, receipt: IntakeReceipt, submission: &Submission) {
        self.summary = Some(CaptureSummary {
            receipt,
            contact_name: submission.contact_name.clone(),
            product_count: submission.products.len(),
            destination: submission.destination_location.clone(),
        });
    }

    pub fn clear(&mut self) {
        self.summary = None;
    }

    fn details(&self) -> Vec<Line<'static>> {
        let Some(summary) = &self.summary else {
            return Vec::new();
        };
        vec![
            Line::from(vec![
                Span::styled("Lead ID:     ", Styles::inactive()),
                Span::raw(summary.receipt.lead_id.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Contact:     ", Styles::inactive()),
                Span::raw(summary.contact_name.clone()),
            ]),
            Line::from(vec![
                Span::styled("Products:    ", Styles::inactive()),
                Span::raw(summary.product_count.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Destination: ", Styles::inactive()),
                Span::raw(summary.destination.clone()),
            ]),
            Line::from(vec![
                Span::styled("Received:    ", Styles::inactive()),
                Span::raw(
                    summary
                        .receipt
                        .delivered_at
                        .format("%d-%m-%Y %H:%M UTC")
                        .to_string(),
                ),
            ]),
        ]
    }
}

impl Screen for ConfirmationScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // Message
                Constraint::Min(0),    // Details
                Constraint::Length(3), // Button
            ])
            .split(area);

        let message = Paragraph::new(vec![
            Line::from(Span::styled("✓ Lead Successfully Captured!", Styles::success())),
            Line::from(""),
            Line::from(
                "Thank you for submitting your requirements. Our team will review your information and contact you shortly.",
            ),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled("STEELBAZAAR", Styles::title()))
                .borders(Borders::ALL)
                .border_style(Styles::success()),
        );
        f.render_widget(message, chunks[0]);

        let details = Paragraph::new(self.details()).block(
            Block::default()
                .title("Submission")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(details, chunks[1]);

        let button = Paragraph::new("[ Submit Another Requirement ]")
            .style(Styles::button())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );
        f.render_widget(button, chunks[2]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n') => ScreenAction::Reset,
            KeyCode::Esc => ScreenAction::Quit,
            _ => ScreenAction::None,
        }
    }

    fn screen_type(&self) -> ScreenType {
        ScreenType::Confirmation
    }

    fn help_text(&self) -> &'static str {
        "Confirmation:\n\
        Enter / n - Submit another requirement\n\
        Esc - Quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use uuid::Uuid;

    fn submission() -> Submission {
        Submission {
            products: Vec::new(),
            destination_location: "Pune".to_string(),
            expected_delivery_date: "01-12-2025".to_string(),
            contact_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            gstin: None,
            additional_info: None,
            file: None,
        }
    }

    #[test]
    fn test_enter_requests_reset() {
        let mut screen = ConfirmationScreen::new();
        assert_eq!(
            screen.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            ScreenAction::Reset
        );
        assert_eq!(
            screen.handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            ScreenAction::None
        );
    }

    #[test]
    fn test_renders_summary() {
        let mut screen = ConfirmationScreen::new();
        let receipt = IntakeReceipt {
            lead_id: Uuid::new_v4(),
            channel: "log".to_string(),
            delivered_at: Utc::now(),
        };
        screen.show(receipt, &submission());

        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                screen.draw(f, area)
            })
            .unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Lead Successfully Captured!"));
        assert!(rendered.contains("Asha Rao"));
        assert!(rendered.contains("Submit Another Requirement"));
    }
}
