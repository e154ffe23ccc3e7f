use serde::{Deserialize, Serialize};

use super::facts::{
    Appointment, ExtractedFacts, HealthMetric, Medication, Recommendation,
};

/// The whole per-user health record. One aggregate, persisted as a single
/// JSON document, loaded and rewritten in full on every mutating operation.
///
/// Every sequence is append-only: entries are never mutated or removed after
/// insertion, and entry ids are assigned as `sequence length + 1` at append
/// time. That id scheme is only safe under pure append — revisit it before
/// ever adding a deletion feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub health_metrics: Vec<HealthMetric>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub chat_history: Vec<ChatEntry>,
}

/// One ingested document with its analysis, kept for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub text: String,
    pub analysis: ExtractedFacts,
    pub uploaded_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// One question/answer exchange with the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: u64,
    pub user_message: String,
    pub ai_response: String,
    pub timestamp: String,
}
