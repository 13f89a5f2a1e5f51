//! Lead form Terminal User Interface (TUI)
//!
//! Interactive capture of steel purchase requirements: contact details, up to
//! five product line items with category-dependent fields, delivery details
//! and an optional attachment.

pub mod app;
pub mod components;
pub mod handlers;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::App;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use crate::config::Config;
use crate::intake::LeadIntake;

/// Take over the terminal and run the form until the user quits
pub async fn run_tui(config: Config, intake: Box<dyn LeadIntake>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, intake);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(_) => info!("Lead form exited"),
        Err(e) => error!("Lead form encountered an error: {}", e),
    }
    result
}
