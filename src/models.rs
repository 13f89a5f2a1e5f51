use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::attachment::Attachment;
use crate::schema::validate_quantity;

/// Steel product categories offered on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    HotRolled,
    ColdRolled,
    Galvanized,
    Tinfree,
    Tinplate,
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::HotRolled,
        ProductCategory::ColdRolled,
        ProductCategory::Galvanized,
        ProductCategory::Tinfree,
        ProductCategory::Tinplate,
        ProductCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::HotRolled => "HOT ROLLED",
            ProductCategory::ColdRolled => "COLD ROLLED",
            ProductCategory::Galvanized => "GALVANIZED",
            ProductCategory::Tinfree => "TINFREE",
            ProductCategory::Tinplate => "TINPLATE",
            ProductCategory::Other => "OTHER",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProductCategory::HotRolled => "HOT_ROLLED",
            ProductCategory::ColdRolled => "COLD_ROLLED",
            ProductCategory::Galvanized => "GALVANIZED",
            ProductCategory::Tinfree => "TINFREE",
            ProductCategory::Tinplate => "TINPLATE",
            ProductCategory::Other => "OTHER",
        }
    }

    /// Whether a line item of this category shows `field`.
    ///
    /// Fields that are not category-dependent are always shown.
    pub fn shows(self, field: ProductField) -> bool {
        use ProductCategory::*;
        match field {
            ProductField::OtherProductType => self == Other,
            ProductField::Hardness => matches!(self, HotRolled | ColdRolled | Galvanized),
            ProductField::CoatingGrade => matches!(self, Galvanized | Tinfree | Tinplate),
            ProductField::Temper => matches!(self, Tinfree | Tinplate),
            _ => true,
        }
    }

    /// The category-dependent fields visible for this category, in form order
    pub fn optional_fields(self) -> Vec<ProductField> {
        ProductField::CONDITIONAL
            .iter()
            .copied()
            .filter(|field| self.shows(*field))
            .collect()
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        ProductCategory::ALL
            .into_iter()
            .find(|category| category.code() == normalized)
            .ok_or_else(|| format!("Unknown product category: {}", s))
    }
}

/// Fields of a single product line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    ProductType,
    OtherProductType,
    Standard,
    Grade,
    Shape,
    Quantity,
    Thickness,
    Width,
    Length,
    Hardness,
    CoatingGrade,
    Temper,
}

impl ProductField {
    /// Form order of a line item once a category has been chosen
    pub const ORDER: [ProductField; 12] = [
        ProductField::ProductType,
        ProductField::OtherProductType,
        ProductField::Standard,
        ProductField::Grade,
        ProductField::Shape,
        ProductField::Quantity,
        ProductField::Thickness,
        ProductField::Width,
        ProductField::Length,
        ProductField::Hardness,
        ProductField::CoatingGrade,
        ProductField::Temper,
    ];

    /// Fields whose visibility depends on the category
    pub const CONDITIONAL: [ProductField; 4] = [
        ProductField::OtherProductType,
        ProductField::Hardness,
        ProductField::CoatingGrade,
        ProductField::Temper,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProductField::ProductType => "product_type",
            ProductField::OtherProductType => "other_product_type",
            ProductField::Standard => "standard",
            ProductField::Grade => "grade",
            ProductField::Shape => "shape",
            ProductField::Quantity => "quantity",
            ProductField::Thickness => "thickness",
            ProductField::Width => "width",
            ProductField::Length => "length",
            ProductField::Hardness => "hardness",
            ProductField::CoatingGrade => "coating_grade",
            ProductField::Temper => "temper",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductField::ProductType => "Product Category",
            ProductField::OtherProductType => "Specify Product Category",
            ProductField::Standard => "Standard",
            ProductField::Grade => "Grade",
            ProductField::Shape => "Shape",
            ProductField::Quantity => "Required Quantity (MT)",
            ProductField::Thickness => "Thickness (MM)",
            ProductField::Width => "Width (MM)",
            ProductField::Length => "Length (MM)",
            ProductField::Hardness => "Hardness",
            ProductField::CoatingGrade => "Coating Grade",
            ProductField::Temper => "Temper",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ProductField::ProductType => "Select product category",
            ProductField::OtherProductType => "Enter product category",
            ProductField::Standard => "Enter standard",
            ProductField::Grade => "Enter grade",
            ProductField::Shape => "Enter shape",
            ProductField::Quantity => "Enter quantity",
            ProductField::Thickness => "Enter thickness",
            ProductField::Width => "Enter width",
            ProductField::Length => "Enter length",
            ProductField::Hardness => "Enter hardness",
            ProductField::CoatingGrade => "Enter coating grade",
            ProductField::Temper => "Enter temper",
        }
    }
}

/// One requested product as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProductLineDraft {
    #[validate(required(message = "Please select a product category"))]
    pub product_type: Option<ProductCategory>,
    pub other_product_type: String,
    #[validate(length(min = 1, message = "Standard is required"))]
    pub standard: String,
    #[validate(length(min = 1, message = "Grade is required"))]
    pub grade: String,
    #[validate(length(min = 1, message = "Shape is required"))]
    pub shape: String,
    #[validate(custom(function = "validate_quantity"))]
    pub quantity: String,
    #[validate(length(min = 1, message = "Thickness is required"))]
    pub thickness: String,
    #[validate(length(min = 1, message = "Width is required"))]
    pub width: String,
    #[validate(length(min = 1, message = "Length is required"))]
    pub length: String,
    pub hardness: String,
    pub coating_grade: String,
    pub temper: String,
}

impl ProductLineDraft {
    /// Whether `field` is currently shown for this item.
    ///
    /// Nothing beyond the category selector is shown until a category is chosen.
    pub fn shows(&self, field: ProductField) -> bool {
        match self.product_type {
            Some(category) => category.shows(field),
            None => field == ProductField::ProductType,
        }
    }

    /// Visible fields of this item in form order
    pub fn visible_fields(&self) -> Vec<ProductField> {
        ProductField::ORDER
            .iter()
            .copied()
            .filter(|field| self.shows(*field))
            .collect()
    }

    pub fn text(&self, field: ProductField) -> Option<&str> {
        let value = match field {
            ProductField::ProductType => return None,
            ProductField::OtherProductType => &self.other_product_type,
            ProductField::Standard => &self.standard,
            ProductField::Grade => &self.grade,
            ProductField::Shape => &self.shape,
            ProductField::Quantity => &self.quantity,
            ProductField::Thickness => &self.thickness,
            ProductField::Width => &self.width,
            ProductField::Length => &self.length,
            ProductField::Hardness => &self.hardness,
            ProductField::CoatingGrade => &self.coating_grade,
            ProductField::Temper => &self.temper,
        };
        Some(value.as_str())
    }

    pub fn text_mut(&mut self, field: ProductField) -> Option<&mut String> {
        let value = match field {
            ProductField::ProductType => return None,
            ProductField::OtherProductType => &mut self.other_product_type,
            ProductField::Standard => &mut self.standard,
            ProductField::Grade => &mut self.grade,
            ProductField::Shape => &mut self.shape,
            ProductField::Quantity => &mut self.quantity,
            ProductField::Thickness => &mut self.thickness,
            ProductField::Width => &mut self.width,
            ProductField::Length => &mut self.length,
            ProductField::Hardness => &mut self.hardness,
            ProductField::CoatingGrade => &mut self.coating_grade,
            ProductField::Temper => &mut self.temper,
        };
        Some(value)
    }
}

/// The editable candidate submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LeadDraft {
    #[validate(nested)]
    pub products: Vec<ProductLineDraft>,
    #[validate(length(min = 3, message = "Destination location is required"))]
    pub destination_location: String,
    #[validate(length(min = 1, message = "Expected delivery date is required"))]
    pub expected_delivery_date: String,
    #[validate(length(min = 2, message = "Contact name is required"))]
    pub contact_name: String,
    #[validate(length(min = 10, message = "Please enter a valid phone number"))]
    pub phone: String,
    pub gstin: String,
    pub additional_info: String,
    pub file: Option<Attachment>,
}

impl Default for LeadDraft {
    fn default() -> Self {
        Self {
            products: vec![ProductLineDraft::default()],
            destination_location: String::new(),
            expected_delivery_date: String::new(),
            contact_name: String::new(),
            phone: String::new(),
            gstin: String::new(),
            additional_info: String::new(),
            file: None,
        }
    }
}

impl LeadDraft {
    /// Text value behind a form field; `None` for non-text fields or missing items
    pub fn text(&self, field: LeadField) -> Option<&str> {
        match field {
            LeadField::ContactName => Some(&self.contact_name),
            LeadField::Phone => Some(&self.phone),
            LeadField::Gstin => Some(&self.gstin),
            LeadField::Product(index, product_field) => {
                self.products.get(index).and_then(|item| item.text(product_field))
            }
            LeadField::DestinationLocation => Some(&self.destination_location),
            LeadField::ExpectedDeliveryDate => Some(&self.expected_delivery_date),
            LeadField::AdditionalInfo => Some(&self.additional_info),
            LeadField::File => None,
        }
    }

    pub fn text_mut(&mut self, field: LeadField) -> Option<&mut String> {
        match field {
            LeadField::ContactName => Some(&mut self.contact_name),
            LeadField::Phone => Some(&mut self.phone),
            LeadField::Gstin => Some(&mut self.gstin),
            LeadField::Product(index, product_field) => self
                .products
                .get_mut(index)
                .and_then(|item| item.text_mut(product_field)),
            LeadField::DestinationLocation => Some(&mut self.destination_location),
            LeadField::ExpectedDeliveryDate => Some(&mut self.expected_delivery_date),
            LeadField::AdditionalInfo => Some(&mut self.additional_info),
            LeadField::File => None,
        }
    }
}

/// Addressable field of the whole form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    ContactName,
    Phone,
    Gstin,
    Product(usize, ProductField),
    DestinationLocation,
    ExpectedDeliveryDate,
    File,
    AdditionalInfo,
}

impl LeadField {
    /// Error path of this field, e.g. `products[2].quantity`
    pub fn path(&self) -> String {
        match self {
            LeadField::ContactName => "contact_name".to_string(),
            LeadField::Phone => "phone".to_string(),
            LeadField::Gstin => "gstin".to_string(),
            LeadField::Product(index, field) => format!("products[{}].{}", index, field.name()),
            LeadField::DestinationLocation => "destination_location".to_string(),
            LeadField::ExpectedDeliveryDate => "expected_delivery_date".to_string(),
            LeadField::File => "file".to_string(),
            LeadField::AdditionalInfo => "additional_info".to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadField::ContactName => "Contact Name",
            LeadField::Phone => "Phone Number",
            LeadField::Gstin => "GSTIN (optional)",
            LeadField::Product(_, field) => field.label(),
            LeadField::DestinationLocation => "Destination Location",
            LeadField::ExpectedDeliveryDate => "Expected Delivery Date",
            LeadField::File => "Upload Product Information",
            LeadField::AdditionalInfo => "Additional Information",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            LeadField::ContactName => "Enter your full name",
            LeadField::Phone => "Enter your phone number",
            LeadField::Gstin => "Enter your GSTIN number",
            LeadField::Product(_, field) => field.placeholder(),
            LeadField::DestinationLocation => "Enter city, state, country",
            LeadField::ExpectedDeliveryDate => "YYYY-MM-DD",
            LeadField::File => "Path to PDF, DOC, DOCX, JPG, JPEG or PNG (max. 5MB)",
            LeadField::AdditionalInfo => "Any other details you'd like to share (max 500 words)",
        }
    }
}

/// An accepted product line with coerced values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub product_type: ProductCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_product_type: Option<String>,
    pub standard: String,
    pub grade: String,
    pub shape: String,
    /// Metric tons
    pub quantity: f64,
    pub thickness: String,
    pub width: String,
    pub length: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coating_grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temper: Option<String>,
}

/// A validated lead ready to hand over to an intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub products: Vec<ProductLine>,
    pub destination_location: String,
    pub expected_delivery_date: String,
    pub contact_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Attachment>,
}

/// Blank strings become `None`
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_visibility_mapping() {
        use ProductCategory::*;

        assert_eq!(HotRolled.optional_fields(), vec![ProductField::Hardness]);
        assert_eq!(ColdRolled.optional_fields(), vec![ProductField::Hardness]);
        assert_eq!(
            Galvanized.optional_fields(),
            vec![ProductField::Hardness, ProductField::CoatingGrade]
        );
        assert_eq!(
            Tinfree.optional_fields(),
            vec![ProductField::CoatingGrade, ProductField::Temper]
        );
        assert_eq!(
            Tinplate.optional_fields(),
            vec![ProductField::CoatingGrade, ProductField::Temper]
        );
        assert_eq!(Other.optional_fields(), vec![ProductField::OtherProductType]);
    }

    #[test]
    fn test_uncategorized_item_shows_only_selector() {
        let item = ProductLineDraft::default();
        assert_eq!(item.visible_fields(), vec![ProductField::ProductType]);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("HOT_ROLLED".parse::<ProductCategory>().unwrap(), ProductCategory::HotRolled);
        assert_eq!("cold rolled".parse::<ProductCategory>().unwrap(), ProductCategory::ColdRolled);
        assert_eq!("tin-plate".parse::<ProductCategory>().ok(), None);
        assert!("stainless".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_as_code() {
        let json = serde_json::to_string(&ProductCategory::Tinfree).unwrap();
        assert_eq!(json, "\"TINFREE\"");
        let parsed: ProductCategory = serde_json::from_str("\"HOT_ROLLED\"").unwrap();
        assert_eq!(parsed, ProductCategory::HotRolled);
    }

    #[test]
    fn test_field_paths() {
        assert_eq!(LeadField::ContactName.path(), "contact_name");
        assert_eq!(
            LeadField::Product(2, ProductField::Quantity).path(),
            "products[2].quantity"
        );
        assert_eq!(
            LeadField::Product(0, ProductField::CoatingGrade).path(),
            "products[0].coating_grade"
        );
    }

    #[test]
    fn test_draft_text_access() {
        let mut draft = LeadDraft::default();
        draft
            .text_mut(LeadField::Product(0, ProductField::Grade))
            .unwrap()
            .push_str("E250");
        assert_eq!(draft.text(LeadField::Product(0, ProductField::Grade)), Some("E250"));
        assert_eq!(draft.text(LeadField::Product(3, ProductField::Grade)), None);
        assert_eq!(draft.text(LeadField::Product(0, ProductField::ProductType)), None);
        assert_eq!(draft.text(LeadField::File), None);
    }

    #[test]
    fn test_partial_draft_deserializes_with_defaults() {
        let draft: LeadDraft = serde_json::from_str(r#"{"contact_name": "Ravi"}"#).unwrap();
        assert_eq!(draft.contact_name, "Ravi");
        assert_eq!(draft.products.len(), 1);
        assert!(draft.file.is_none());
    }
}
