//! Session-aware chat entry point.
//!
//! `handle_message` is the one inbound operation: (session id, text) in,
//! reply text out. It owns the write discipline around the session
//! store — the turn runs on a working copy, and the result is written
//! back only when the whole turn succeeded. Combined with the
//! per-session gate this makes concurrent posts to one session yield
//! "busy" errors instead of interleaved or lost transcripts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use adjutant_core::error::{AgentError, Result};
use adjutant_core::session::SessionStore;

use crate::turn::TurnRunner;

/// Serializes turns per session id.
///
/// Holding the std mutex is brief (map lookup only); the per-session
/// tokio mutex is what stays held across the turn's await points.
struct TurnGate {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TurnGate {
    fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Take the session's turn slot, or report the session busy.
    fn acquire(&self, session_id: &str) -> std::result::Result<OwnedTurnSlot, AgentError> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.try_lock_owned()
            .map_err(|_| AgentError::SessionBusy(session_id.to_string()))
    }
}

type OwnedTurnSlot = tokio::sync::OwnedMutexGuard<()>;

/// The conversational service: store + runner + gate.
pub struct ChatService {
    store: Arc<dyn SessionStore>,
    runner: TurnRunner,
    gate: TurnGate,
}

impl ChatService {
    pub fn new(store: Arc<dyn SessionStore>, runner: TurnRunner) -> Self {
        Self {
            store,
            runner,
            gate: TurnGate::new(),
        }
    }

    /// Run one full user turn for a session and return the reply.
    ///
    /// Failure modes:
    /// - another turn is in flight for this session → `SessionBusy`
    /// - the model fails, stalls, or never settles → that turn error,
    ///   with the stored transcript left exactly as it was before the
    ///   message arrived
    pub async fn handle_message(&self, session_id: &str, text: &str) -> Result<String> {
        let _turn_slot = self.gate.acquire(session_id)?;
        info!(session_id, "turn started");

        let mut transcript = self.store.append_user_turn(session_id, text).await;
        let reply = self.runner.run(&mut transcript).await?;

        self.store.put(session_id, transcript).await;
        debug!(session_id, "transcript persisted");
        Ok(reply)
    }
}
