use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::attachment::Attachment;
use crate::errors::LeadError;
use crate::models::LeadDraft;

#[derive(Parser)]
#[command(name = "steelbazaar-leads")]
#[command(about = "Capture and validate steel procurement requirements from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Launch the interactive lead form (default)
    Form,

    /// Validate a lead draft stored as JSON
    Validate {
        /// Draft file (see `template`)
        #[arg(short, long)]
        input: PathBuf,

        /// Document to attach to the lead
        #[arg(short, long)]
        attach: Option<PathBuf>,
    },

    /// Validate a draft and emit the accepted lead as a JSON line on stdout
    Submit {
        /// Draft file (see `template`)
        #[arg(short, long)]
        input: PathBuf,

        /// Document to attach to the lead
        #[arg(short, long)]
        attach: Option<PathBuf>,
    },

    /// Print an empty draft to start from
    Template,
}

impl Cli {
    /// Subcommand to run; the form when none is given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Form)
    }
}

/// Load a draft from `input`, replacing its attachment with `attach` when given
pub fn load_draft(input: &Path, attach: Option<&Path>) -> Result<LeadDraft, LeadError> {
    let content = std::fs::read_to_string(input)?;
    let mut draft: LeadDraft = serde_json::from_str(&content)?;
    if let Some(path) = attach {
        draft.file = Some(Attachment::from_path(path)?);
    }
    Ok(draft)
}
