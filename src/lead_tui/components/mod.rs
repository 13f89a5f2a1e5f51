//! Reusable UI components for the lead form TUI

pub mod form_field;
pub mod status_display;

pub use form_field::{FormField, FormFieldType, TextCursor};
pub use status_display::{StatusDisplay, StatusType};
