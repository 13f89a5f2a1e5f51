//! Screen modules for the lead form TUI

pub mod confirmation;
pub mod lead_form;

pub use confirmation::ConfirmationScreen;
pub use lead_form::{FormSlot, LeadFormScreen};
