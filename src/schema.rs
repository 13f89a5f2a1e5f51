//! Validation rules for lead submissions
//!
//! Per-field rules are declared with `validator` derives on the draft types in
//! [`crate::models`]. This module adds the rules that depend on more than one
//! field or on the active [`ValidationPolicy`], flattens the error tree into
//! path-addressed messages and coerces an accepted draft into a [`Submission`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::attachment::Attachment;
use crate::models::{non_blank, LeadDraft, ProductCategory, ProductLine, ProductLineDraft, Submission};

pub const MIN_PRODUCTS: usize = 1;
pub const MAX_PRODUCTS: usize = 5;
pub const ADDITIONAL_INFO_LIMIT: usize = 500;

/// Path-addressed validation messages, e.g. `products[2].quantity`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        let messages = self.0.entry(path.into()).or_default();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(|messages| messages.as_slice())
    }

    /// First message for `path`
    pub fn first(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|messages| messages.first()).map(|m| m.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of offending paths
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<String>> {
        self.0.remove(path)
    }

    /// Replace the messages of one path; an empty list clears it
    pub fn set(&mut self, path: &str, messages: Vec<String>) {
        if messages.is_empty() {
            self.0.remove(path);
        } else {
            self.0.insert(path.to_string(), messages);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Drop errors of the removed product and move later products' errors down one index
    pub fn shift_after_product_removal(&mut self, removed: usize) {
        let entries = std::mem::take(&mut self.0);
        for (path, messages) in entries {
            match split_product_path(&path) {
                Some((index, _)) if index == removed => {}
                Some((index, rest)) if index > removed => {
                    self.0.insert(format!("products[{}]{}", index - 1, rest), messages);
                }
                _ => {
                    self.0.insert(path, messages);
                }
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, messages)) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", path, messages.join("; "))?;
        }
        Ok(())
    }
}

/// Split `products[3].grade` into `(3, ".grade")`
fn split_product_path(path: &str) -> Option<(usize, &str)> {
    let rest = path.strip_prefix("products[")?;
    let close = rest.find(']')?;
    let index = rest[..close].parse().ok()?;
    Some((index, &rest[close + 1..]))
}

/// How the additional information limit is counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesLimit {
    #[default]
    Characters,
    Words,
    Both,
}

impl FromStr for NotesLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "characters" | "chars" => Ok(NotesLimit::Characters),
            "words" => Ok(NotesLimit::Words),
            "both" => Ok(NotesLimit::Both),
            other => Err(format!(
                "Unsupported notes limit: {}. Supported values: characters, words, both",
                other
            )),
        }
    }
}

/// Switches for rules the product owner has not settled yet.
///
/// The defaults keep the behavior of the original web form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    pub notes_limit: NotesLimit,
    /// Require `other_product_type` when the category is OTHER
    pub require_other_product_type: bool,
    /// Require an attached document
    pub require_attachment: bool,
    /// Clear values of fields hidden by a category change
    pub clear_hidden_fields: bool,
}

/// Number of whitespace separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn validate_quantity(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("Quantity is required")));
    }
    match value.parse::<f64>() {
        Ok(quantity) if !quantity.is_finite() => Err(not_a_number()),
        Ok(quantity) if quantity <= 0.0 => Err(ValidationError::new("positive")
            .with_message(Cow::Borrowed("Quantity must be positive"))),
        Ok(_) => Ok(()),
        Err(_) => Err(not_a_number()),
    }
}

fn not_a_number() -> ValidationError {
    ValidationError::new("number").with_message(Cow::Borrowed("Quantity must be a number"))
}

/// Check an attached document against the size and type rules.
///
/// Both rules are reported independently.
pub fn attachment_errors(attachment: &Attachment) -> Vec<String> {
    let mut errors = Vec::new();
    if !attachment.is_within_size_limit() {
        errors.push("Max file size is 5MB".to_string());
    }
    if !attachment.is_accepted_type() {
        errors.push("Only PDF, JPEG, PNG, and DOC/DOCX files are accepted".to_string());
    }
    errors
}

/// Collect every rule violation of `draft`
pub fn collect_errors(draft: &LeadDraft, policy: &ValidationPolicy) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Err(tree) = draft.validate() {
        flatten_errors("", &tree, &mut errors);
    }

    if draft.products.len() < MIN_PRODUCTS {
        errors.push("products", "At least one product is required");
    } else if draft.products.len() > MAX_PRODUCTS {
        errors.push("products", "Maximum 5 products allowed");
    }

    if policy.require_other_product_type {
        for (index, item) in draft.products.iter().enumerate() {
            if item.product_type == Some(ProductCategory::Other) && item.other_product_type.trim().is_empty() {
                errors.push(
                    format!("products[{}].other_product_type", index),
                    "Please specify the product category",
                );
            }
        }
    }

    let chars = draft.additional_info.chars().count();
    let words = word_count(&draft.additional_info);
    if matches!(policy.notes_limit, NotesLimit::Characters | NotesLimit::Both) && chars > ADDITIONAL_INFO_LIMIT {
        errors.push("additional_info", "Additional information cannot exceed 500 characters");
    }
    if matches!(policy.notes_limit, NotesLimit::Words | NotesLimit::Both) && words > ADDITIONAL_INFO_LIMIT {
        errors.push("additional_info", "Additional information cannot exceed 500 words");
    }

    match &draft.file {
        Some(attachment) => {
            for message in attachment_errors(attachment) {
                errors.push("file", message);
            }
        }
        None if policy.require_attachment => errors.push("file", "File is required"),
        None => {}
    }

    errors
}

/// Validate the whole draft and coerce it into a [`Submission`]
pub fn validate_lead(draft: &LeadDraft, policy: &ValidationPolicy) -> Result<Submission, FieldErrors> {
    let errors = collect_errors(draft, policy);
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut products = Vec::with_capacity(draft.products.len());
    for (index, item) in draft.products.iter().enumerate() {
        products.push(coerce_product(index, item)?);
    }

    Ok(Submission {
        products,
        destination_location: draft.destination_location.clone(),
        expected_delivery_date: draft.expected_delivery_date.clone(),
        contact_name: draft.contact_name.clone(),
        phone: draft.phone.clone(),
        gstin: non_blank(&draft.gstin),
        additional_info: non_blank(&draft.additional_info),
        file: draft.file.clone(),
    })
}

/// Messages for a single path, as shown when the user leaves that field
pub fn validate_path(draft: &LeadDraft, policy: &ValidationPolicy, path: &str) -> Vec<String> {
    collect_errors(draft, policy)
        .remove(path)
        .unwrap_or_default()
}

fn coerce_product(index: usize, item: &ProductLineDraft) -> Result<ProductLine, FieldErrors> {
    let mut errors = FieldErrors::new();
    let product_type = item.product_type;
    let quantity = item.quantity.trim().parse::<f64>().ok();

    if product_type.is_none() {
        errors.push(format!("products[{}].product_type", index), "Please select a product category");
    }
    if quantity.is_none() {
        errors.push(format!("products[{}].quantity", index), "Quantity must be a number");
    }

    match (product_type, quantity) {
        (Some(product_type), Some(quantity)) => Ok(ProductLine {
            product_type,
            other_product_type: non_blank(&item.other_product_type),
            standard: item.standard.clone(),
            grade: item.grade.clone(),
            shape: item.shape.clone(),
            quantity,
            thickness: item.thickness.clone(),
            width: item.width.clone(),
            length: item.length.clone(),
            hardness: non_blank(&item.hardness),
            coating_grade: non_blank(&item.coating_grade),
            temper: non_blank(&item.temper),
        }),
        _ => Err(errors),
    }
}

fn flatten_errors(prefix: &str, tree: &ValidationErrors, out: &mut FieldErrors) {
    for (field, kind) in tree.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errors) => {
                for error in errors {
                    out.push(path.clone(), message_for(error));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

fn message_for(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value ({})", error.code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::MAX_FILE_SIZE;

    const MIB: u64 = 1024 * 1024;

    fn hot_rolled_item() -> ProductLineDraft {
        ProductLineDraft {
            product_type: Some(ProductCategory::HotRolled),
            standard: "IS 2062".to_string(),
            grade: "E250".to_string(),
            shape: "Coil".to_string(),
            quantity: "25".to_string(),
            thickness: "2.5".to_string(),
            width: "1250".to_string(),
            length: "2500".to_string(),
            ..Default::default()
        }
    }

    fn valid_draft() -> LeadDraft {
        LeadDraft {
            products: vec![hot_rolled_item()],
            destination_location: "Pune, Maharashtra, India".to_string(),
            expected_delivery_date: "07-03-2025".to_string(),
            contact_name: "Asha Verma".to_string(),
            phone: "9876543210".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_draft_is_accepted_and_coerced() {
        let submission = validate_lead(&valid_draft(), &ValidationPolicy::default()).unwrap();
        assert_eq!(submission.products.len(), 1);
        assert_eq!(submission.products[0].quantity, 25.0);
        assert_eq!(submission.products[0].product_type, ProductCategory::HotRolled);
        assert_eq!(submission.gstin, None);
        assert_eq!(submission.additional_info, None);
    }

    #[test]
    fn test_quantity_rules() {
        assert!(validate_quantity("12.5").is_ok());
        assert!(validate_quantity(" 3 ").is_ok());

        for raw in ["0", "-5"] {
            let error = validate_quantity(raw).unwrap_err();
            assert_eq!(error.code, "positive", "{}", raw);
        }
        for raw in ["abc", "NaN", "inf", "12,5"] {
            let error = validate_quantity(raw).unwrap_err();
            assert_eq!(error.code, "number", "{}", raw);
        }
        for raw in ["", "   "] {
            let error = validate_quantity(raw).unwrap_err();
            assert_eq!(error.code, "required");
            assert_eq!(error.message.as_deref(), Some("Quantity is required"));
        }
    }

    #[test]
    fn test_quantity_errors_are_addressed_by_item() {
        let mut draft = valid_draft();
        let mut second = hot_rolled_item();
        second.quantity = "-5".to_string();
        draft.products.push(second);

        let errors = validate_lead(&draft, &ValidationPolicy::default()).unwrap_err();
        assert_eq!(errors.first("products[1].quantity"), Some("Quantity must be positive"));
        assert!(!errors.contains("products[0].quantity"));
    }

    #[test]
    fn test_empty_item_reports_every_required_field() {
        let mut draft = valid_draft();
        draft.products = vec![ProductLineDraft::default()];

        let errors = validate_lead(&draft, &ValidationPolicy::default()).unwrap_err();
        for field in ["product_type", "standard", "grade", "shape", "quantity", "thickness", "width", "length"] {
            assert!(errors.contains(&format!("products[0].{}", field)), "{}", field);
        }
        assert_eq!(
            errors.first("products[0].product_type"),
            Some("Please select a product category")
        );
        assert!(!errors.contains("products[0].hardness"));
    }

    #[test]
    fn test_contact_and_destination_rules() {
        let mut draft = valid_draft();
        draft.contact_name = "A".to_string();
        draft.phone = "12345".to_string();
        draft.destination_location = "NY".to_string();
        draft.expected_delivery_date.clear();

        let errors = validate_lead(&draft, &ValidationPolicy::default()).unwrap_err();
        assert_eq!(errors.first("contact_name"), Some("Contact name is required"));
        assert_eq!(errors.first("phone"), Some("Please enter a valid phone number"));
        assert_eq!(errors.first("destination_location"), Some("Destination location is required"));
        assert_eq!(
            errors.first("expected_delivery_date"),
            Some("Expected delivery date is required")
        );
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_product_count_bounds() {
        let mut draft = valid_draft();
        draft.products.clear();
        let errors = validate_lead(&draft, &ValidationPolicy::default()).unwrap_err();
        assert_eq!(errors.first("products"), Some("At least one product is required"));

        draft.products = vec![hot_rolled_item(); 6];
        let errors = validate_lead(&draft, &ValidationPolicy::default()).unwrap_err();
        assert_eq!(errors.first("products"), Some("Maximum 5 products allowed"));

        draft.products = vec![hot_rolled_item(); 5];
        assert!(validate_lead(&draft, &ValidationPolicy::default()).is_ok());
    }

    #[test]
    fn test_oversized_file_rejected_regardless_of_type() {
        let mut draft = valid_draft();
        draft.file = Some(Attachment::new("drawing.pdf", "application/pdf", 6 * MIB));
        let errors = validate_lead(&draft, &ValidationPolicy::default()).unwrap_err();
        assert_eq!(errors.get("file").unwrap(), ["Max file size is 5MB".to_string()]);
    }

    #[test]
    fn test_unsupported_type_rejected_regardless_of_size() {
        let mut draft = valid_draft();
        draft.file = Some(Attachment::new("photo.gif", "image/gif", MIB));
        let errors = validate_lead(&draft, &ValidationPolicy::default()).unwrap_err();
        assert_eq!(
            errors.first("file"),
            Some("Only PDF, JPEG, PNG, and DOC/DOCX files are accepted")
        );

        draft.file = Some(Attachment::new("photo.gif", "image/gif", 6 * MIB));
        let errors = validate_lead(&draft, &ValidationPolicy::default()).unwrap_err();
        assert_eq!(errors.get("file").map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_accepted_file_passes() {
        let mut draft = valid_draft();
        draft.file = Some(Attachment::new("spec.docx", crate::attachment::ACCEPTED_FILE_TYPES[4], MAX_FILE_SIZE));
        let submission = validate_lead(&draft, &ValidationPolicy::default()).unwrap();
        assert_eq!(submission.file.unwrap().file_name, "spec.docx");
    }

    #[test]
    fn test_attachment_requirement_policy() {
        let policy = ValidationPolicy {
            require_attachment: true,
            ..Default::default()
        };
        let errors = validate_lead(&valid_draft(), &policy).unwrap_err();
        assert_eq!(errors.first("file"), Some("File is required"));
    }

    #[test]
    fn test_other_category_laxity_and_policy() {
        let mut draft = valid_draft();
        draft.products[0].product_type = Some(ProductCategory::Other);
        assert!(validate_lead(&draft, &ValidationPolicy::default()).is_ok());

        let strict = ValidationPolicy {
            require_other_product_type: true,
            ..Default::default()
        };
        let errors = validate_lead(&draft, &strict).unwrap_err();
        assert_eq!(
            errors.first("products[0].other_product_type"),
            Some("Please specify the product category")
        );

        draft.products[0].other_product_type = "Stainless coil".to_string();
        let submission = validate_lead(&draft, &strict).unwrap();
        assert_eq!(
            submission.products[0].other_product_type.as_deref(),
            Some("Stainless coil")
        );
    }

    #[test]
    fn test_notes_limit_modes() {
        let mut draft = valid_draft();
        // 300 words, about 800 characters
        draft.additional_info = "ab ".repeat(200).trim_end().to_string() + &" c".repeat(100);
        assert_eq!(word_count(&draft.additional_info), 300);
        assert!(draft.additional_info.chars().count() > ADDITIONAL_INFO_LIMIT);

        let chars = ValidationPolicy::default();
        let errors = validate_lead(&draft, &chars).unwrap_err();
        assert_eq!(
            errors.first("additional_info"),
            Some("Additional information cannot exceed 500 characters")
        );

        let words = ValidationPolicy {
            notes_limit: NotesLimit::Words,
            ..Default::default()
        };
        assert!(validate_lead(&draft, &words).is_ok());

        draft.additional_info = "x ".repeat(501);
        let errors = validate_lead(&draft, &words).unwrap_err();
        assert_eq!(
            errors.first("additional_info"),
            Some("Additional information cannot exceed 500 words")
        );

        let both = ValidationPolicy {
            notes_limit: NotesLimit::Both,
            ..Default::default()
        };
        let errors = validate_lead(&draft, &both).unwrap_err();
        assert_eq!(errors.get("additional_info").map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_validate_path_returns_only_that_field() {
        let mut draft = valid_draft();
        draft.phone = "123".to_string();
        draft.contact_name = "A".to_string();
        assert_eq!(
            validate_path(&draft, &ValidationPolicy::default(), "phone"),
            vec!["Please enter a valid phone number".to_string()]
        );
        assert!(validate_path(&draft, &ValidationPolicy::default(), "gstin").is_empty());
    }

    #[test]
    fn test_shift_after_product_removal() {
        let mut errors = FieldErrors::new();
        errors.push("products[0].grade", "Grade is required");
        errors.push("products[1].grade", "Grade is required");
        errors.push("products[2].quantity", "Quantity must be positive");
        errors.push("phone", "Please enter a valid phone number");

        errors.shift_after_product_removal(1);

        assert!(errors.contains("products[0].grade"));
        assert!(!errors.contains("products[2].quantity"));
        assert_eq!(errors.first("products[1].quantity"), Some("Quantity must be positive"));
        assert!(errors.contains("phone"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_notes_limit_parsing() {
        assert_eq!("Words".parse::<NotesLimit>().unwrap(), NotesLimit::Words);
        assert_eq!("chars".parse::<NotesLimit>().unwrap(), NotesLimit::Characters);
        assert!("lines".parse::<NotesLimit>().is_err());
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.push("phone", "Please enter a valid phone number");
        errors.push("contact_name", "Contact name is required");
        assert_eq!(
            errors.to_string(),
            "contact_name: Contact name is required\nphone: Please enter a valid phone number"
        );
    }
}
