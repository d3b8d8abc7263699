use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{required, AppError};
use crate::interview::guide::download_file_name;
use crate::models::chat::ChatTurn;
use crate::session::chat::follow_up;
use crate::session::SessionContext;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub reply: ChatTurn,
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionContext>, AppError> {
    Ok(Json(state.sessions.get(id).await?))
}

/// POST /api/v1/sessions/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = required("message", &req.message)?;
    let reply = follow_up(
        state.llm.as_deref(),
        state.config.llm_timeout(),
        &state.sessions,
        id,
        message,
    )
    .await?;
    Ok(Json(ChatResponse {
        session_id: id,
        reply,
    }))
}

/// GET /api/v1/sessions/:id/download
/// The session's guide as a plain-text attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.get(id).await?;
    let file_name = download_file_name(&session.company, &session.role);
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, session.guide.document))
}
