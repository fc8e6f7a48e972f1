//! Session store — keyed transcript state across turns.
//!
//! `get` never fails: an unseen session id yields a fresh empty
//! transcript, created lazily. `put` replaces unconditionally. Turn
//! serialization is the agent service's concern; the store itself is
//! plain synchronized keyed storage.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::message::{Message, Transcript};

/// Keyed transcript storage, one entry per session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The stored transcript, or a fresh empty one for an unseen id.
    async fn get(&self, session_id: &str) -> Transcript;

    /// Replace the stored transcript for this session.
    async fn put(&self, session_id: &str, transcript: Transcript);

    /// Fetch and append one user message. The updated transcript is not
    /// persisted; callers `put` only after the turn completes, which
    /// keeps a failed turn out of the stored state.
    async fn append_user_turn(&self, session_id: &str, text: &str) -> Transcript {
        let mut transcript = self.get(session_id).await;
        transcript.push(Message::user(text));
        transcript
    }
}

/// In-memory backing: state lives for the process lifetime and is lost
/// on restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Transcript>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Transcript {
        if let Some(transcript) = self.sessions.read().await.get(session_id) {
            return transcript.clone();
        }
        debug!(session_id = %session_id, "new session");
        Transcript::new()
    }

    async fn put(&self, session_id: &str, transcript: Transcript) {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), transcript);
    }
}
