//! Duplicate-safe merging of extracted facts into the health record.
//!
//! Pure functions over an explicit `HealthRecord` value: nothing here
//! persists anything. The orchestration layer saves once per request after
//! all merges.

use crate::models::{ChatEntry, ExtractedFacts, HealthRecord};

/// What one merge contributed, per fact kind. Duplicates are counted as
/// skipped, not errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub medications_added: usize,
    pub appointments_added: usize,
    pub health_metrics_added: usize,
    pub recommendations_added: usize,
}

impl MergeOutcome {
    pub fn total_added(&self) -> usize {
        self.medications_added
            + self.appointments_added
            + self.health_metrics_added
            + self.recommendations_added
    }
}

/// Merge extracted facts into the record, skipping structural duplicates.
///
/// For each fact kind, each incoming item is appended only if no
/// structurally-equal item already exists in that sequence (linear scan,
/// full-value equality). Append order follows input order. Never fails;
/// empty input kinds contribute nothing.
pub fn merge_facts(record: &mut HealthRecord, facts: &ExtractedFacts) -> MergeOutcome {
    MergeOutcome {
        medications_added: append_missing(&mut record.medications, &facts.medications),
        appointments_added: append_missing(&mut record.appointments, &facts.appointments),
        health_metrics_added: append_missing(&mut record.health_metrics, &facts.health_metrics),
        recommendations_added: append_missing(
            &mut record.recommendations,
            &facts.recommendations,
        ),
    }
}

fn append_missing<T: PartialEq + Clone>(existing: &mut Vec<T>, incoming: &[T]) -> usize {
    let mut added = 0;
    for item in incoming {
        if !existing.contains(item) {
            existing.push(item.clone());
            added += 1;
        }
    }
    added
}

/// Append the ingested document and return its id.
///
/// Must run before `merge_facts` so the provenance document exists even when
/// the merge contributes nothing new. Id is `documents.len() + 1` — safe
/// only while the sequence is pure-append.
pub fn add_document(
    record: &mut HealthRecord,
    text: impl Into<String>,
    analysis: ExtractedFacts,
    owner: Option<String>,
) -> u64 {
    let id = record.documents.len() as u64 + 1;
    record.documents.push(crate::models::Document {
        id,
        text: text.into(),
        analysis,
        uploaded_at: chrono::Utc::now().to_rfc3339(),
        owner,
    });
    id
}

/// Append one chat exchange and return its id (`chat_history.len() + 1`).
pub fn add_chat_entry(
    record: &mut HealthRecord,
    user_message: impl Into<String>,
    ai_response: impl Into<String>,
) -> u64 {
    let id = record.chat_history.len() as u64 + 1;
    record.chat_history.push(ChatEntry {
        id,
        user_message: user_message.into(),
        ai_response: ai_response.into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    });
    id
}
