//! One analysis action: precondition → prompt → single LLM call → parse.
//!
//! Upstream failures (no resume text, LLM transport errors) abort the action.
//! Anything wrong with the reply itself is carried in `ParseResult::Unparsed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::parser::{parse, ParseResult};
use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::schema::SchemaVariant;
use crate::errors::AppError;
use crate::llm_client::CompletionProvider;

pub const EMPTY_RESUME_MESSAGE: &str =
    "Could not extract text from the file. It might be empty, corrupted, or an image-based PDF.";

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub schema: SchemaVariant,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub model: String,
    pub schema: SchemaVariant,
    pub result: ParseResult,
}

/// Runs one analysis. The provider is called exactly once, and only when the
/// resume text is non-blank.
pub async fn run_analysis(
    llm: &dyn CompletionProvider,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(EMPTY_RESUME_MESSAGE.to_string()));
    }

    let analysis_id = Uuid::new_v4();
    let has_jd = request
        .job_description
        .as_deref()
        .is_some_and(|jd| !jd.trim().is_empty());
    info!(
        "Analysis {analysis_id}: schema={:?}, resume_chars={}, job_description={}",
        request.schema,
        request.resume_text.chars().count(),
        has_jd
    );

    let prompt = build_analysis_prompt(
        request.schema,
        &request.resume_text,
        request.job_description.as_deref(),
    );

    let reply = llm
        .complete(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;

    let result = parse(reply.trim(), request.schema);
    match &result {
        ParseResult::Parsed {
            scores, feedback, ..
        } => info!(
            "Analysis {analysis_id}: parsed {} scores and {} feedback sections",
            scores.len(),
            feedback.len()
        ),
        ParseResult::Unparsed { reason, .. } => warn!(
            "Analysis {analysis_id}: reply could not be parsed ({reason:?}), falling back to raw text"
        ),
    }

    Ok(AnalysisReport {
        analysis_id,
        analyzed_at: Utc::now(),
        model: llm.model().to_string(),
        schema: request.schema,
        result,
    })
}
