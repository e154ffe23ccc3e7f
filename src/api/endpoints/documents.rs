//! Document ingestion endpoints.
//!
//! Two ways in: raw text (`/upload`) and an image file (`/import-file`),
//! which goes through vision text extraction first. Both then share the
//! same ingest path: analyze → append document → merge facts → save.

use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::models::ExtractedFacts;
use crate::store::merge::{add_document, merge_facts};

#[derive(Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub analysis: ExtractedFacts,
    pub document_id: u64,
}

/// `POST /upload` — ingest a free-text medical document.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("No document text provided".into()));
    }

    ingest(&ctx, &user, text).await
}

/// `POST /import-file` — ingest a document photo or scan.
///
/// The image goes to the completion service for text extraction; an
/// unreadable image is surfaced as an error rather than ingested empty.
pub async fn import_file(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") || field.file_name().is_some() {
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;
            file = Some((bytes, mime_type));
            break;
        }
    }

    let (bytes, mime_type) = file.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }

    let text = ctx
        .gateway
        .extract_text_from_image(&bytes, &mime_type)
        .await
        .map_err(|e| ApiError::Internal(format!("Could not extract text from image: {e}")))?;
    if text.is_empty() {
        return Err(ApiError::BadRequest(
            "No readable text found in the image".into(),
        ));
    }

    ingest(&ctx, &user, &text).await
}

/// Shared ingest path. The gateway call runs before the record lock is
/// taken; the read-modify-write itself is serialized.
async fn ingest(
    ctx: &ApiContext,
    user: &UserContext,
    text: &str,
) -> Result<Json<UploadResponse>, ApiError> {
    let analysis = ctx.gateway.analyze(text).await;

    let (document_id, outcome) = {
        let _guard = ctx.lock_record().await;
        let mut record = ctx.repository.load()?;
        let document_id = add_document(
            &mut record,
            text,
            analysis.clone(),
            Some(user.user.clone()),
        );
        let outcome = merge_facts(&mut record, &analysis);
        ctx.repository.save(&record)?;
        (document_id, outcome)
    };

    tracing::info!(
        document_id,
        facts_added = outcome.total_added(),
        "Document ingested"
    );

    Ok(Json(UploadResponse {
        message: "Document analyzed successfully",
        analysis,
        document_id,
    }))
}
