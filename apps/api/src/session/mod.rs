//! In-memory conversation sessions.
//!
//! A session is created by a successful analysis and holds the guide plus the
//! append-only chat transcript used as context for follow-up questions.
//! Nothing is persisted. The store holds at most `MAX_SESSIONS` sessions and
//! drops the least recently active one to make room.

pub mod chat;
pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::guide::InterviewGuide;
use crate::models::chat::ChatTurn;

#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub guide: InterviewGuide,
    pub transcript: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
    /// Last time a turn was appended; drives eviction.
    pub updated_at: DateTime<Utc>,
}

impl SessionContext {
    /// New session whose transcript already holds the request and the guide,
    /// so the first follow-up question has context.
    pub fn seeded(company: &str, role: &str, guide: InterviewGuide) -> Self {
        let transcript = vec![
            ChatTurn::user(request_summary(company, role)),
            ChatTurn::assistant(guide.document.clone()),
        ];
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company: company.to_string(),
            role: role.to_string(),
            guide,
            transcript,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The user turn recorded for an analysis request.
pub fn request_summary(company: &str, role: &str) -> String {
    format!("Prepare me for the {role} position at {company} using my résumé.")
}

/// Shared session map with a size cap. The lock covers map access only and
/// is never held across a model call.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: Arc::default(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Stores a session, first evicting the least recently active ones while
    /// the store is full.
    pub async fn insert(&self, session: SessionContext) -> Uuid {
        let id = session.id;
        let mut sessions = self.inner.write().await;
        while sessions.len() >= self.max_sessions && !sessions.contains_key(&id) {
            let Some(stale) = sessions
                .values()
                .min_by_key(|s| s.updated_at)
                .map(|s| s.id)
            else {
                break;
            };
            sessions.remove(&stale);
            debug!("Evicted session {stale} to stay under {} sessions", self.max_sessions);
        }
        sessions.insert(id, session);
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionContext, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Snapshot of the transcript, for building a model request.
    pub async fn transcript(&self, id: Uuid) -> Result<Vec<ChatTurn>, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|s| s.transcript.clone())
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Appends turns in order. Turns are never removed or reordered.
    pub async fn append(&self, id: Uuid, turns: Vec<ChatTurn>) -> Result<(), AppError> {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        session.transcript.extend(turns);
        session.updated_at = Utc::now();
        Ok(())
    }
}
