use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::models::Extraction;
use crate::resume::pipeline::{extract_local, parse_resume, ParseOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResumeTextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub parse_id: Uuid,
    #[serde(flatten)]
    pub outcome: ParseOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub parse_id: Uuid,
    #[serde(flatten)]
    pub extraction: Extraction,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    payload: Result<Json<ResumeTextRequest>, JsonRejection>,
) -> Result<Json<ParseResponse>, AppError> {
    let Json(req) = payload?;
    let parse_id = Uuid::new_v4();
    let outcome = parse_resume(&req.text, state.ai_backend.as_ref(), parse_id).await?;
    if outcome.used_fallback() {
        debug!("Resume parse {parse_id} served from heuristic fallback");
    }
    Ok(Json(ParseResponse { parse_id, outcome }))
}

/// POST /api/v1/resumes/extract
/// Heuristics only; never calls the AI backend.
pub async fn handle_extract(
    payload: Result<Json<ResumeTextRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let Json(req) = payload?;
    let parse_id = Uuid::new_v4();
    let extraction = extract_local(&req.text)?;
    debug!(
        "Local extraction {parse_id}: {} fields found",
        extraction.fields_found()
    );
    Ok(Json(ExtractResponse {
        parse_id,
        extraction,
    }))
}
