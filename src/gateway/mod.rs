//! Extraction gateway — all call shapes against the completion service.
//!
//! Protocol shared by every shape: build prompt → one completion call →
//! parse or fall back. Analyze, chat, and insights never error outward;
//! upstream failures are classified and absorbed into degraded-but-valid
//! content. There is no retry loop here — "retry" wording in fallback text
//! is advice to the human, not behavior of this layer.

pub mod classify;
pub mod client;
pub mod parse;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::models::{ExtractedFacts, HealthRecord, Medication};

pub use classify::{classify, FailureKind};
pub use client::{CompletionClient, CompletionError, CompletionRequest, GeminiClient, MockCompletionClient};
pub use parse::{extract_array, extract_object, ParseOutcome};

// ═══════════════════════════════════════════════════════════
// Response shapes
// ═══════════════════════════════════════════════════════════

/// Insight bundle generated over the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthInsights {
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub trends: Vec<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl HealthInsights {
    /// Fixed degraded structure used when generation or parsing fails.
    fn fallback() -> Self {
        Self {
            insights: vec!["Not enough analyzable data yet — upload more documents.".into()],
            recommendations: vec![
                "Keep your record current by uploading new medical documents.".into(),
            ],
            trends: vec!["No trends available yet.".into()],
            alerts: vec!["None identified.".into()],
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Gateway
// ═══════════════════════════════════════════════════════════

/// Wraps the completion collaborator with the document-analysis, chat,
/// insight, scheduling, probe, and image-text call shapes.
pub struct ExtractionGateway {
    client: std::sync::Arc<dyn CompletionClient>,
}

impl ExtractionGateway {
    pub fn new(client: std::sync::Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Extract structured facts from raw document text.
    ///
    /// Always returns usable facts: an unparseable or failed analysis comes
    /// back as empty sequences plus one advisory recommendation.
    pub async fn analyze(&self, document_text: &str) -> ExtractedFacts {
        let prompt = format!(
            "{}\n\nDOCUMENT TEXT:\n{}",
            prompts::DOCUMENT_ANALYSIS,
            document_text
        );

        let raw = match self.client.complete(&CompletionRequest::text(prompt)).await {
            Ok(raw) => raw,
            Err(e) => {
                let kind = classify(&e);
                tracing::warn!(kind = kind.as_str(), error = %e, "Document analysis failed");
                return ExtractedFacts::with_notice(analysis_notice(kind));
            }
        };

        match extract_object::<ExtractedFacts>(&raw) {
            ParseOutcome::Parsed(facts) => facts,
            ParseOutcome::Unparseable(raw) => {
                tracing::warn!(
                    response_len = raw.len(),
                    "Document analysis response was not valid JSON"
                );
                ExtractedFacts::with_notice("Document processed but structure unclear")
            }
        }
    }

    /// Answer a health question using the accumulated record as context.
    ///
    /// Returns the trimmed model response, or a class-specific apology on
    /// upstream failure.
    pub async fn chat(&self, message: &str, record: &HealthRecord) -> String {
        let prompt = format!(
            "{}\n\nUSER'S HEALTH PROFILE:\n{}\n\nUSER MESSAGE: {}\n\n\
             Please provide a helpful, personalized response based on their health data.",
            prompts::HEALTH_CHAT,
            context_summary(record),
            message
        );

        match self.client.complete(&CompletionRequest::text(prompt)).await {
            Ok(raw) => raw.trim().to_string(),
            Err(e) => {
                let kind = classify(&e);
                tracing::warn!(kind = kind.as_str(), error = %e, "Chat generation failed");
                chat_apology(kind).to_string()
            }
        }
    }

    /// Generate record-wide insights.
    ///
    /// Parse failure or upstream failure both yield the fixed fallback
    /// structure; this call never errors outward.
    pub async fn insights(&self, record: &HealthRecord) -> HealthInsights {
        let record_json =
            serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string());
        let prompt = format!(
            "{}\n\nHEALTH RECORD:\n{}",
            prompts::HEALTH_INSIGHTS,
            record_json
        );

        let raw = match self.client.complete(&CompletionRequest::text(prompt)).await {
            Ok(raw) => raw,
            Err(e) => {
                let kind = classify(&e);
                tracing::warn!(kind = kind.as_str(), error = %e, "Insight generation failed");
                return HealthInsights::fallback();
            }
        };

        match extract_object::<HealthInsights>(&raw) {
            ParseOutcome::Parsed(insights) => insights,
            ParseOutcome::Unparseable(raw) => {
                tracing::warn!(
                    response_len = raw.len(),
                    "Insight response was not valid JSON"
                );
                HealthInsights::fallback()
            }
        }
    }

    /// Ask the model for a 7-day medication schedule, returning its raw
    /// response text. The synthesizer owns validation and fallback.
    pub async fn schedule(
        &self,
        medications: &[Medication],
        today: chrono::NaiveDate,
    ) -> Result<String, CompletionError> {
        let meds_json =
            serde_json::to_string_pretty(medications).unwrap_or_else(|_| "[]".to_string());
        let prompt = format!(
            "{}\n\nMEDICATIONS TO SCHEDULE:\n{}\n\n\
             Create a 7-day schedule starting from today ({}).\n\
             Return as JSON array of calendar events.",
            prompts::MEDICATION_SCHEDULER,
            meds_json,
            today.format("%Y-%m-%d")
        );
        self.client.complete(&CompletionRequest::text(prompt)).await
    }

    /// Fixed test prompt for the health endpoint.
    pub async fn probe(&self) -> Result<(), CompletionError> {
        self.client
            .complete(&CompletionRequest::text(prompts::PROBE))
            .await
            .map(|_| ())
    }

    /// Vision-shaped call: extract the raw text from a document image.
    ///
    /// Errors propagate — an unreadable image has no degraded-content
    /// equivalent, so the caller decides how to report it.
    pub async fn extract_text_from_image(
        &self,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, CompletionError> {
        let request =
            CompletionRequest::with_image(prompts::IMAGE_TEXT_EXTRACTION, mime_type, bytes);
        let raw = self.client.complete(&request).await?;
        Ok(raw.trim().to_string())
    }
}

// ═══════════════════════════════════════════════════════════
// Fallback content + context rendering
// ═══════════════════════════════════════════════════════════

fn analysis_notice(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::RateLimited => {
            "AI analysis is rate-limited right now. Your document was preserved — try analyzing it again later."
        }
        FailureKind::AuthFailure => {
            "The AI service is misconfigured (API key problem). Please contact support."
        }
        FailureKind::Transient => {
            "A temporary error interrupted the analysis. It will be retried automatically."
        }
    }
}

fn chat_apology(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::RateLimited => {
            "I'm handling a lot of requests right now and hit my usage limit. Please try again in a few minutes."
        }
        FailureKind::AuthFailure => {
            "I can't reach my AI service due to a configuration problem. Please contact support."
        }
        FailureKind::Transient => {
            "I'm having trouble processing your request right now. Please try again or contact support."
        }
    }
}

/// Condensed textual record summary for the chat prompt — one line per item.
fn context_summary(record: &HealthRecord) -> String {
    let mut lines = Vec::new();

    lines.push("MEDICATIONS:".to_string());
    for med in &record.medications {
        lines.push(format!(
            "- {} {} — {}",
            med.name, med.dosage, med.frequency
        ));
    }
    lines.push("APPOINTMENTS:".to_string());
    for appt in &record.appointments {
        lines.push(format!(
            "- {} with {} on {} ({})",
            appt.kind, appt.doctor, appt.date, appt.reason
        ));
    }
    lines.push("HEALTH METRICS:".to_string());
    for metric in &record.health_metrics {
        lines.push(format!(
            "- {}: {} on {} ({})",
            metric.metric, metric.value, metric.date, metric.status
        ));
    }
    lines.push("RECOMMENDATIONS:".to_string());
    for rec in &record.recommendations {
        lines.push(format!("- {}", rec.as_str()));
    }

    lines.join("\n")
}
