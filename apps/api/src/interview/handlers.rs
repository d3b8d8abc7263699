use anyhow::Context;
use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::{required, AppError};
use crate::interview::guide::{analyze, download_file_name, Analysis};
use crate::interview::prompt_builder::build_prompt;
use crate::interview::templates::{get_template, known_roles};
use crate::models::resume::StructuredResume;
use crate::resume::pdf;
use crate::resume::validation::validate;
use crate::session::SessionContext;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub company: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub session_id: Uuid,
    pub company: String,
    pub role: String,
    #[serde(flatten)]
    pub analysis: Analysis,
    pub download_file_name: String,
}

#[derive(Deserialize)]
pub struct TemplateQuery {
    pub role: String,
}

#[derive(Deserialize)]
pub struct PromptRequest {
    /// Structured résumé of unknown shape; validated before use.
    #[serde(default)]
    pub resume: Value,
    pub company: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct PromptResponse {
    pub resume: StructuredResume,
    pub prompt: String,
}

#[derive(Serialize)]
pub struct RolesResponse {
    pub roles: Vec<&'static str>,
}

/// Fields of the analyze upload form.
#[derive(Default)]
struct AnalyzeUpload {
    resume: Option<Bytes>,
    company: Option<String>,
    role: Option<String>,
}

/// POST /api/v1/interview/analyze
/// Multipart form: `resume` (PDF file), `company`, `role`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_upload(multipart).await?;

    let company = required("company", upload.company.as_deref().unwrap_or_default())?;
    let role = required("role", upload.role.as_deref().unwrap_or_default())?;
    let resume = upload
        .resume
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("resume PDF is required".to_string()))?;

    info!("Received résumé upload ({} bytes)", resume.len());

    // pdf parsing is CPU-bound; keep it off the async workers
    let resume_text = tokio::task::spawn_blocking(move || pdf::extract_text(&resume))
        .await
        .context("PDF extraction task failed")??;

    Ok(Json(run_analysis(&state, &resume_text, company, role).await))
}

/// POST /api/v1/interview/analyze-text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let resume_text = required("resume_text", &req.resume_text)?;
    let company = required("company", &req.company)?;
    let role = required("role", &req.role)?;

    Ok(Json(run_analysis(&state, resume_text, company, role).await))
}

/// GET /api/v1/interview/templates?role=
/// Returns the fallback guide for a role as plain text.
pub async fn handle_get_template(Query(params): Query<TemplateQuery>) -> Result<String, AppError> {
    let role = required("role", &params.role)?;
    Ok(get_template(role))
}

/// GET /api/v1/interview/roles
pub async fn handle_list_roles() -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: known_roles(),
    })
}

/// POST /api/v1/interview/prompt
/// Validates a structured résumé and renders the interview prompt for it.
pub async fn handle_build_prompt(
    Json(req): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    let company = required("company", &req.company)?;
    let role = required("role", &req.role)?;

    let resume = validate(&req.resume);
    let prompt = build_prompt(&resume.reportable_skills(), company, role);
    Ok(Json(PromptResponse { resume, prompt }))
}

async fn read_upload(mut multipart: Multipart) -> Result<AnalyzeUpload, AppError> {
    let mut upload = AnalyzeUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume file: {e}")))?;
                upload.resume = Some(data);
            }
            "company" | "role" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid {name} field: {e}")))?;
                if name == "company" {
                    upload.company = Some(value);
                } else {
                    upload.role = Some(value);
                }
            }
            _ => {}
        }
    }

    Ok(upload)
}

async fn run_analysis(
    state: &AppState,
    resume_text: &str,
    company: &str,
    role: &str,
) -> AnalyzeResponse {
    let analysis = analyze(
        state.llm.as_deref(),
        state.config.llm_timeout(),
        resume_text,
        company,
        role,
    )
    .await;

    let session = SessionContext::seeded(company, role, analysis.guide.clone());
    let session_id = state.sessions.insert(session).await;
    info!(
        "Session {session_id} created ({:?} guide)",
        analysis.guide.source
    );

    AnalyzeResponse {
        session_id,
        company: company.to_string(),
        role: role.to_string(),
        download_file_name: download_file_name(company, role),
        analysis,
    }
}
