//! Hosts intake sessions keyed by session id.
//!
//! Each session sits behind its own mutex: a turn on one session never waits
//! for another, and two turns on the same session run one after the other.

use crate::pipeline::Pipeline;
use std::collections::HashMap;
use std::sync::Arc;
use syllabus_shared::rpc::{SessionSnapshot, SessionTurnResponse};
use syllabus_shared::{IntakeSession, Language, Result, SyllabusError, Turn};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};
use uuid::Uuid;

type SessionSlot = Arc<Mutex<IntakeSession>>;

pub struct IntakeHost {
    sessions: RwLock<HashMap<Uuid, SessionSlot>>,
    pipeline: Arc<Pipeline>,
}

impl IntakeHost {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            pipeline,
        }
    }

    /// Create a session and return its greeting
    pub async fn open(&self, language: Language) -> SessionTurnResponse {
        let id = Uuid::new_v4();
        let mut session = IntakeSession::new(language);
        let messages = session.start();
        let step = session.step();

        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        info!("Opened intake session {} ({})", id, language);

        SessionTurnResponse {
            session_id: id.to_string(),
            step,
            messages,
        }
    }

    async fn slot(&self, session_id: &str) -> Result<(Uuid, SessionSlot)> {
        let id = Uuid::parse_str(session_id)
            .map_err(|_| SyllabusError::SessionNotFound(session_id.to_string()))?;
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .cloned()
            .map(|slot| (id, slot))
            .ok_or_else(|| SyllabusError::SessionNotFound(session_id.to_string()))
    }

    /// Feed one user message. Generation failures come back as messages.
    ///
    /// A completed questionnaire runs on its own task that owns the session
    /// lock, so the cycle still completes and resets the session when the
    /// caller times out or disconnects.
    pub async fn turn(&self, session_id: &str, text: &str) -> Result<SessionTurnResponse> {
        let (id, slot) = self.slot(session_id).await?;
        let mut session = slot.lock_owned().await;

        let turn = session.handle(text);
        let (messages, step) = match turn {
            Turn::Reply(replies) => (replies, session.step()),
            Turn::Generate {
                mut replies,
                request,
            } => {
                debug!("Session {} completed the questionnaire", id);
                let pipeline = Arc::clone(&self.pipeline);
                let cycle = tokio::spawn(async move {
                    let outcome = pipeline.run(&request).await;
                    replies.extend(session.complete(&outcome));
                    (replies, session.step())
                });
                cycle.await.map_err(|e| {
                    error!("Generation task for session {} failed: {}", id, e);
                    SyllabusError::Generation(format!("generation task failed: {}", e))
                })?
            }
        };

        Ok(SessionTurnResponse {
            session_id: id.to_string(),
            step,
            messages,
        })
    }

    pub async fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot> {
        let (id, slot) = self.slot(session_id).await?;
        let session = slot.lock().await;
        Ok(SessionSnapshot {
            session_id: id.to_string(),
            language: session.language(),
            step: session.step(),
            history: session.history().to_vec(),
        })
    }

    /// Drop a session. An in-flight generation for it still runs to completion.
    pub async fn abandon(&self, session_id: &str) -> Result<()> {
        let id = Uuid::parse_str(session_id)
            .map_err(|_| SyllabusError::SessionNotFound(session_id.to_string()))?;
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Abandoned intake session {}", id);
                Ok(())
            }
            None => Err(SyllabusError::SessionNotFound(session_id.to_string())),
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
