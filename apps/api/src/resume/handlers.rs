use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{required, AppError};
use crate::models::resume::StructuredResume;
use crate::resume::extractor::extract;
use crate::resume::validation::{normalize, validate};

#[derive(Deserialize)]
pub struct ParseRequest {
    pub resume_text: String,
}

/// POST /api/v1/resume/parse
pub async fn handle_parse(
    Json(req): Json<ParseRequest>,
) -> Result<Json<StructuredResume>, AppError> {
    let text = required("resume_text", &req.resume_text)?;
    Ok(Json(normalize(extract(text))))
}

/// POST /api/v1/resume/validate
/// Accepts any JSON value and returns it repaired into a well-shaped résumé.
pub async fn handle_validate(Json(raw): Json<Value>) -> Json<StructuredResume> {
    Json(validate(&raw))
}
