//! Follow-up chat over a session transcript.
//!
//! Unlike guide generation there is no template to fall back to: a failed
//! turn is reported to the caller and leaves the transcript untouched, so the
//! same question can be asked again.

use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LanguageModel, LlmError};
use crate::models::chat::ChatTurn;
use crate::session::SessionStore;

/// Answers `message` in the context of session `id` and records both turns.
pub async fn follow_up(
    llm: Option<&dyn LanguageModel>,
    timeout: Duration,
    sessions: &SessionStore,
    id: Uuid,
    message: &str,
) -> Result<ChatTurn, AppError> {
    let history = sessions.transcript(id).await?;

    let reply = match ask(llm, timeout, &history, message).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Follow-up for session {id} failed: {e}");
            return Err(AppError::Llm(e));
        }
    };

    let answer = ChatTurn::assistant(reply);
    sessions
        .append(id, vec![ChatTurn::user(message), answer.clone()])
        .await?;

    info!(
        "Session {id}: answered follow-up ({} turns in transcript)",
        history.len() + 2
    );
    Ok(answer)
}

async fn ask(
    llm: Option<&dyn LanguageModel>,
    timeout: Duration,
    history: &[ChatTurn],
    message: &str,
) -> Result<String, LlmError> {
    let llm = llm.ok_or(LlmError::Disabled)?;
    let reply = tokio::time::timeout(timeout, llm.converse(history, message))
        .await
        .map_err(|_| LlmError::Timeout {
            secs: timeout.as_secs(),
        })??;

    let reply = reply.trim();
    if reply.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(reply.to_string())
}
