use serde::{Deserialize, Serialize};

/// One medication extracted from a document.
///
/// All fields are free text as the model produced them; absent fields
/// deserialize to empty strings. Two medications are duplicates only when
/// every field matches — differing refill dates are two distinct entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub refill_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Appointment type ("follow-up", "lab work", ...). `type` on the wire.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub doctor: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthMetric {
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: String,
}

/// A free-text action item. Stored as a plain string on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation(pub String);

impl Recommendation {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Structured facts extracted from one document analysis.
///
/// Every sequence defaults to empty: an analysis response that omits a key
/// contributes nothing for that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFacts {
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub health_metrics: Vec<HealthMetric>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl ExtractedFacts {
    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
            && self.appointments.is_empty()
            && self.health_metrics.is_empty()
            && self.recommendations.is_empty()
    }

    /// Empty facts carrying a single advisory recommendation. Used by the
    /// gateway when a document cannot be structured.
    pub fn with_notice(notice: impl Into<String>) -> Self {
        Self {
            recommendations: vec![Recommendation::new(notice)],
            ..Self::default()
        }
    }
}
