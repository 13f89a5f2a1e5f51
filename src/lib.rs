//! SteelBazaar lead capture
//!
//! Validation rules, form state and terminal presentation for capturing a
//! buyer's steel purchase requirements.

pub mod attachment;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dates;
pub mod errors;
pub mod intake;
pub mod lead_tui;
pub mod models;
pub mod schema;

pub use controller::{FormController, FormState};
pub use errors::LeadError;
pub use models::{LeadDraft, ProductCategory, Submission};
pub use schema::{FieldErrors, ValidationPolicy};
