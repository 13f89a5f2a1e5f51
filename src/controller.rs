//! Form controller: owns the editable draft and the Editing/Submitted state

use tracing::{debug, info, warn};

use crate::attachment::Attachment;
use crate::dates::format_delivery_date;
use crate::errors::LeadError;
use crate::intake::{IntakeReceipt, LeadIntake};
use crate::models::{LeadDraft, ProductCategory, ProductField, ProductLineDraft, Submission};
use crate::schema::{self, FieldErrors, ValidationPolicy, MAX_PRODUCTS, MIN_PRODUCTS};

/// Presentation state of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitted,
}

/// Live state of one form session
#[derive(Debug, Clone)]
pub struct FormController {
    draft: LeadDraft,
    state: FormState,
    errors: FieldErrors,
    policy: ValidationPolicy,
    last_submission: Option<Submission>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

impl FormController {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            draft: LeadDraft::default(),
            state: FormState::Editing,
            errors: FieldErrors::new(),
            policy,
            last_submission: None,
        }
    }

    /// Start from an existing draft, e.g. one loaded from JSON
    pub fn with_draft(policy: ValidationPolicy, draft: LeadDraft) -> Self {
        Self {
            draft,
            ..Self::new(policy)
        }
    }

    pub fn draft(&self) -> &LeadDraft {
        &self.draft
    }

    /// Direct access for text edits while Editing; list structure changes go
    /// through [`add_product`](Self::add_product) and [`remove_product`](Self::remove_product)
    pub fn draft_mut(&mut self) -> Option<&mut LeadDraft> {
        if self.is_editing() {
            Some(&mut self.draft)
        } else {
            None
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.state == FormState::Submitted
    }

    pub fn is_editing(&self) -> bool {
        self.state == FormState::Editing
    }

    fn refuse_when_submitted(&self, operation: &str) -> bool {
        if self.is_editing() {
            return false;
        }
        debug!("{} refused: lead already submitted", operation);
        true
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn products(&self) -> &[ProductLineDraft] {
        &self.draft.products
    }

    pub fn last_submission(&self) -> Option<&Submission> {
        self.last_submission.as_ref()
    }

    pub fn can_add_product(&self) -> bool {
        self.draft.products.len() < MAX_PRODUCTS
    }

    pub fn can_remove_product(&self) -> bool {
        self.draft.products.len() > MIN_PRODUCTS
    }

    /// Append an empty line item; refused once five items exist
    pub fn add_product(&mut self) -> bool {
        if self.refuse_when_submitted("Add product") {
            return false;
        }
        if !self.can_add_product() {
            debug!("Add product refused: already {} items", self.draft.products.len());
            return false;
        }
        self.draft.products.push(ProductLineDraft::default());
        info!("Product {} added", self.draft.products.len());
        true
    }

    /// Remove the line item at `index`; refused when it is the last one
    pub fn remove_product(&mut self, index: usize) -> bool {
        if self.refuse_when_submitted("Remove product") {
            return false;
        }
        if !self.can_remove_product() || index >= self.draft.products.len() {
            debug!("Remove product {} refused", index);
            return false;
        }
        self.draft.products.remove(index);
        self.errors.shift_after_product_removal(index);
        info!("Product {} removed, {} remaining", index + 1, self.draft.products.len());
        true
    }

    pub fn set_product_type(&mut self, index: usize, category: ProductCategory) -> bool {
        if self.refuse_when_submitted("Category change") {
            return false;
        }
        let clear_hidden = self.policy.clear_hidden_fields;
        let Some(item) = self.draft.products.get_mut(index) else {
            return false;
        };

        item.product_type = Some(category);
        if clear_hidden {
            for field in ProductField::CONDITIONAL {
                if !category.shows(field) {
                    if let Some(value) = item.text_mut(field) {
                        value.clear();
                    }
                }
            }
        }
        self.errors.remove(&format!("products[{}].product_type", index));
        debug!("Product {} category set to {}", index + 1, category.code());
        true
    }

    /// Whether `field` of item `index` is shown; derived from the item's category
    pub fn is_visible(&self, index: usize, field: ProductField) -> bool {
        self.draft
            .products
            .get(index)
            .map(|item| item.shows(field))
            .unwrap_or(false)
    }

    /// Record the chosen file; it is only validated, never uploaded
    pub fn set_file(&mut self, attachment: Attachment) -> bool {
        if self.refuse_when_submitted("Attachment") {
            return false;
        }
        info!(
            file = %attachment.file_name,
            mime = %attachment.mime_type,
            size = attachment.size_bytes,
            "Attachment selected"
        );
        self.draft.file = Some(attachment);
        self.refresh_path("file");
        true
    }

    pub fn clear_file(&mut self) -> bool {
        if self.refuse_when_submitted("Attachment removal") {
            return false;
        }
        self.draft.file = None;
        self.errors.remove("file");
        true
    }

    /// Display name of the attached file
    pub fn file_name(&self) -> Option<&str> {
        self.draft.file.as_ref().map(|file| file.file_name.as_str())
    }

    /// Store the delivery date, normalized to `DD-MM-YYYY` when it parses
    pub fn set_delivery_date(&mut self, raw: &str) -> bool {
        if self.refuse_when_submitted("Delivery date") {
            return false;
        }
        self.draft.expected_delivery_date = format_delivery_date(raw);
        true
    }

    /// Attach an error produced outside the schema, e.g. an unreadable file
    pub fn set_field_error(&mut self, path: &str, message: impl Into<String>) {
        if self.refuse_when_submitted("Field error") {
            return;
        }
        self.errors.set(path, vec![message.into()]);
    }

    /// Re-check one field and store its messages; returns them.
    /// A submitted lead has nothing left to check.
    pub fn validate_field(&mut self, path: &str) -> &[String] {
        if self.refuse_when_submitted("Field validation") {
            return &[];
        }
        self.refresh_path(path);
        self.errors.get(path).unwrap_or(&[])
    }

    fn refresh_path(&mut self, path: &str) {
        let messages = schema::validate_path(&self.draft, &self.policy, path);
        self.errors.set(path, messages);
    }

    fn ensure_editing(&self) -> Result<(), LeadError> {
        if self.refuse_when_submitted("Submit") {
            return Err(LeadError::AlreadySubmitted);
        }
        Ok(())
    }

    /// Validate everything without changing state
    fn accept(&mut self) -> Result<Submission, FieldErrors> {
        match schema::validate_lead(&self.draft, &self.policy) {
            Ok(submission) => {
                self.errors.clear();
                Ok(submission)
            }
            Err(errors) => {
                warn!("Submission blocked: {} field(s) invalid", errors.len());
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validate and move to Submitted
    pub fn submit(&mut self) -> Result<Submission, LeadError> {
        self.ensure_editing()?;
        let submission = self.accept()?;
        self.finish(submission.clone());
        Ok(submission)
    }

    /// Validate, hand the lead to `intake` and move to Submitted once it is acknowledged.
    ///
    /// A delivery failure leaves the form in Editing with the draft intact.
    pub async fn submit_to(&mut self, intake: &dyn LeadIntake) -> Result<IntakeReceipt, LeadError> {
        self.ensure_editing()?;
        let submission = self.accept()?;
        match intake.deliver(&submission).await {
            Ok(receipt) => {
                info!(lead_id = %receipt.lead_id, channel = %receipt.channel, "Lead submitted");
                self.finish(submission);
                Ok(receipt)
            }
            Err(e) => {
                warn!(channel = intake.channel(), "Lead delivery failed: {}", e);
                Err(e.into())
            }
        }
    }

    fn finish(&mut self, submission: Submission) {
        self.last_submission = Some(submission);
        self.state = FormState::Submitted;
    }

    /// Back to Editing with a single empty line item
    pub fn reset(&mut self) {
        self.draft = LeadDraft::default();
        self.errors.clear();
        self.last_submission = None;
        self.state = FormState::Editing;
        debug!("Form reset");
    }
}
