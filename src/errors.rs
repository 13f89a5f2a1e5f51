//! Error types for lead capture

use thiserror::Error;

use crate::intake::IntakeError;
use crate::schema::FieldErrors;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("Submission blocked: {} field(s) need attention", .0.len())]
    Validation(FieldErrors),

    #[error("Lead already submitted; start a new requirement first")]
    AlreadySubmitted,

    #[error("Attachment '{path}' could not be read: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Lead delivery failed: {0}")]
    Intake(#[from] IntakeError),

    #[error("Failed to parse lead draft: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<FieldErrors> for LeadError {
    fn from(errors: FieldErrors) -> Self {
        LeadError::Validation(errors)
    }
}

impl LeadError {
    /// Field errors carried by a blocked submission
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            LeadError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
