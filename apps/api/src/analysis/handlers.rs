//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

use crate::analysis::parser::{parse, ParseResult};
use crate::analysis::schema::SchemaVariant;
use crate::analysis::service::{run_analysis, AnalysisRequest};
use crate::errors::AppError;
use crate::extraction::{extract_text, ExtractionError, MediaType};
use crate::report::views::AnalysisView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub raw_reply: String,
    #[serde(default)]
    pub schema: SchemaVariant,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload: `resume` (PDF or TXT file, required), `job_description`
/// (text, optional), `schema` (`simple` | `with_section_analysis`, optional).
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisView>, AppError> {
    let mut resume: Option<(Bytes, MediaType)> = None;
    let mut job_description: Option<String> = None;
    let mut schema = SchemaVariant::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let media_type = MediaType::resolve(field.content_type(), field.file_name())?;
                let bytes = field.bytes().await?;
                resume = Some((bytes, media_type));
            }
            "job_description" => job_description = Some(field.text().await?),
            "schema" => {
                schema = field
                    .text()
                    .await?
                    .parse()
                    .map_err(AppError::Validation)?;
            }
            _ => {}
        }
    }

    let (bytes, media_type) =
        resume.ok_or_else(|| AppError::Validation("Please upload your resume first.".to_string()))?;
    info!(
        "Resume upload received: {:?}, {} bytes",
        media_type,
        bytes.len()
    );

    let resume_text = extract_resume_text(bytes, media_type).await?;
    let request = AnalysisRequest {
        resume_text,
        job_description,
        schema,
    };

    analyze(&state, request).await
}

/// POST /api/v1/analyze/text
///
/// Same pipeline as the upload endpoint, for callers that already hold the resume text.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisView>, AppError> {
    analyze(&state, request).await
}

/// POST /api/v1/parse
///
/// Parses a model reply obtained elsewhere. Never fails on malformed replies.
pub async fn handle_parse(Json(request): Json<ParseRequest>) -> Json<ParseResult> {
    let result = parse(request.raw_reply.trim(), request.schema);
    if let Some(kind) = result.failure_kind() {
        debug!("Submitted reply fell back to raw text: {kind:?}");
    }
    Json(result)
}

async fn analyze(state: &AppState, request: AnalysisRequest) -> Result<Json<AnalysisView>, AppError> {
    let report = run_analysis(state.llm.as_ref(), &request).await?;
    Ok(Json(AnalysisView::from_report(
        report,
        &request.resume_text,
        request.job_description.as_deref(),
    )))
}

/// PDF decoding is CPU-bound and may panic on malformed input, so it runs on
/// the blocking pool and a panic is reported as an unreadable PDF.
async fn extract_resume_text(bytes: Bytes, media_type: MediaType) -> Result<String, AppError> {
    match tokio::task::spawn_blocking(move || extract_text(&bytes, media_type)).await {
        Ok(extracted) => Ok(extracted?),
        Err(e) if e.is_panic() => Err(AppError::Extraction(ExtractionError::Pdf(
            "the file could not be decoded".to_string(),
        ))),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "text extraction task failed: {e}"
        ))),
    }
}
