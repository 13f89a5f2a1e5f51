//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{error, info, warn};

use super::{
    components::StatusDisplay,
    handlers::CommonKeyHandler,
    screens::{ConfirmationScreen, LeadFormScreen},
    traits::{Screen as _, ScreenAction},
    ui::centered_rect,
};
use crate::config::Config;
use crate::errors::LeadError;
use crate::intake::{IntakeReceipt, LeadIntake};

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Confirmation,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Form => "Your Requirements",
            Screen::Confirmation => "Lead Captured",
        }
    }
}

/// Main TUI application state
pub struct App {
    /// Application configuration
    pub config: Config,

    // Screen states
    pub form: LeadFormScreen,
    pub confirmation: ConfirmationScreen,

    /// Where accepted leads are handed over
    intake: Box<dyn LeadIntake>,

    // Global application state
    pub status: StatusDisplay,
    pub should_quit: bool,
    pub show_help_popup: bool,
    pub last_receipt: Option<IntakeReceipt>,
}

impl App {
    /// Create a new TUI application
    pub fn new(config: Config, intake: Box<dyn LeadIntake>) -> Self {
        let form = LeadFormScreen::new(config.policy);
        Self {
            config,
            form,
            confirmation: ConfirmationScreen::new(),
            intake,
            status: StatusDisplay::new(),
            should_quit: false,
            show_help_popup: false,
            last_receipt: None,
        }
    }

    /// Current screen, derived from the form state
    pub fn current_screen(&self) -> Screen {
        if self.form.controller.is_submitted() {
            Screen::Confirmation
        } else {
            Screen::Form
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!(channel = self.intake.channel(), "Lead form ready");

        loop {
            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = crossterm::event::read()? {
                // Windows terminals also report key releases
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key).await;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle keyboard input events
    pub async fn handle_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = CommonKeyHandler::handle_global_keys(key) {
            self.apply_action(action).await;
            return;
        }

        if self.show_help_popup {
            if key.code == KeyCode::Esc {
                self.show_help_popup = false;
            }
            return;
        }

        let action = match self.current_screen() {
            Screen::Form => self.form.handle_key_event(key),
            Screen::Confirmation => self.confirmation.handle_key_event(key),
        };
        self.apply_action(action).await;
    }

    async fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::Submit => self.submit().await,
            ScreenAction::Reset => {
                self.form.reset();
                self.confirmation.clear();
                self.status.set_info("Ready for a new requirement".to_string());
            }
            ScreenAction::ToggleHelp => self.show_help_popup = !self.show_help_popup,
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetWarning(message) => self.status.set_warning(message),
            ScreenAction::None => {}
        }
    }

    async fn submit(&mut self) {
        match self.form.controller.submit_to(self.intake.as_ref()).await {
            Ok(receipt) => {
                if let Some(submission) = self.form.controller.last_submission() {
                    self.confirmation.show(receipt.clone(), submission);
                }
                self.status
                    .set_success(format!("Lead {} captured", receipt.lead_id));
                self.last_receipt = Some(receipt);
            }
            Err(LeadError::Validation(errors)) => {
                warn!("Form has {} invalid field(s)", errors.len());
                self.form.focus_first_error();
                self.status.set_error(format!(
                    "Please fix {} field(s) before submitting",
                    errors.len()
                ));
            }
            Err(e) => {
                error!("Lead submission failed: {}", e);
                self.status.set_error(format!("Submission failed: {}", e));
            }
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let screen = self.current_screen();
        match screen {
            Screen::Form => self.form.draw(f, chunks[0]),
            Screen::Confirmation => self.confirmation.draw(f, chunks[0]),
        }

        let idle_text = format!(
            "SteelBazaar Leads - {} | F1: Help | Ctrl+C: Quit",
            screen.as_str()
        );
        self.status.render(f, chunks[1], &idle_text);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(80, 70, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    /// Get context-sensitive help content
    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            Ctrl+C / Ctrl+Q - Quit application\n\
            F1 - Toggle this help\n\
            Esc - Close this help\n\n";

        let screen_help = match self.current_screen() {
            Screen::Form => self.form.help_text(),
            Screen::Confirmation => self.confirmation.help_text(),
        };

        format!("{}{}", global_help, screen_help)
    }
}
