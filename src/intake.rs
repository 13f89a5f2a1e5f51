//! Hand-off of accepted leads to whoever processes them next

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::Submission;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Lead intake rejected the submission: {0}")]
    Rejected(String),

    #[error("Failed to serialize lead: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write lead: {0}")]
    Io(#[from] std::io::Error),
}

/// Acknowledgement returned by an intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeReceipt {
    pub lead_id: Uuid,
    pub channel: String,
    pub delivered_at: DateTime<Utc>,
}

/// What an intake receives: the submission plus capture metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadEnvelope {
    pub lead_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub submission: Submission,
}

impl LeadEnvelope {
    pub fn new(submission: &Submission) -> Self {
        Self {
            lead_id: Uuid::new_v4(),
            captured_at: Utc::now(),
            submission: submission.clone(),
        }
    }

    fn receipt(&self, channel: &str) -> IntakeReceipt {
        IntakeReceipt {
            lead_id: self.lead_id,
            channel: channel.to_string(),
            delivered_at: Utc::now(),
        }
    }
}

/// Receiver of accepted leads
#[async_trait]
pub trait LeadIntake: Send + Sync {
    /// Short name used in logs and receipts
    fn channel(&self) -> &str;

    async fn deliver(&self, submission: &Submission) -> Result<IntakeReceipt, IntakeError>;
}

/// Records accepted leads in the application log only
#[derive(Debug, Default)]
pub struct LogIntake;

#[async_trait]
impl LeadIntake for LogIntake {
    fn channel(&self) -> &str {
        "log"
    }

    async fn deliver(&self, submission: &Submission) -> Result<IntakeReceipt, IntakeError> {
        let envelope = LeadEnvelope::new(submission);
        info!(
            lead_id = %envelope.lead_id,
            contact = %submission.contact_name,
            products = submission.products.len(),
            destination = %submission.destination_location,
            "Lead captured"
        );
        debug!("Lead payload: {}", serde_json::to_string(&envelope)?);
        Ok(envelope.receipt(self.channel()))
    }
}

/// Writes each lead as one JSON line
pub struct JsonLinesIntake<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesIntake<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> LeadIntake for JsonLinesIntake<W> {
    fn channel(&self) -> &str {
        "json-lines"
    }

    async fn deliver(&self, submission: &Submission) -> Result<IntakeReceipt, IntakeError> {
        let envelope = LeadEnvelope::new(submission);
        let line = serde_json::to_string(&envelope)?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| IntakeError::Rejected("writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;

        info!(lead_id = %envelope.lead_id, channel = self.channel(), "Lead delivered");
        Ok(envelope.receipt(self.channel()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductCategory, ProductLine};

    fn submission() -> Submission {
        Submission {
            products: vec![ProductLine {
                product_type: ProductCategory::Galvanized,
                other_product_type: None,
                standard: "IS 277".to_string(),
                grade: "GP".to_string(),
                shape: "Sheet".to_string(),
                quantity: 40.0,
                thickness: "0.5".to_string(),
                width: "1220".to_string(),
                length: "2440".to_string(),
                hardness: None,
                coating_grade: Some("Z120".to_string()),
                temper: None,
            }],
            destination_location: "Chennai".to_string(),
            expected_delivery_date: "15-08-2025".to_string(),
            contact_name: "K. Iyer".to_string(),
            phone: "9840012345".to_string(),
            gstin: Some("33ABCDE1234F1Z5".to_string()),
            additional_info: None,
            file: None,
        }
    }

    #[tokio::test]
    async fn test_log_intake_acknowledges() {
        let receipt = LogIntake.deliver(&submission()).await.unwrap();
        assert_eq!(receipt.channel, "log");
    }

    #[tokio::test]
    async fn test_json_lines_intake_writes_envelope() {
        let intake = JsonLinesIntake::new(Vec::new());
        let receipt = intake.deliver(&submission()).await.unwrap();
        let output = String::from_utf8(intake.into_inner()).unwrap();

        assert_eq!(output.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(value["lead_id"], receipt.lead_id.to_string());
        assert_eq!(value["submission"]["products"][0]["product_type"], "GALVANIZED");
        assert_eq!(value["submission"]["products"][0]["coating_grade"], "Z120");
        assert!(value["submission"]["products"][0].get("hardness").is_none());
    }
}
