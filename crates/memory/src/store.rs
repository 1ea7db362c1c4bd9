use crate::config::MemoryConfig;
use crate::error::{MemoryError, Result};
use crate::types::ConversationState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Session-keyed conversation states for a multi-tenant process.
///
/// Each session sits behind its own mutex, so callers get one exclusive
/// accessor per session while distinct sessions proceed in parallel.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<ConversationState>>>>,
    config: MemoryConfig,
}

impl SessionStore {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Handle for `session_id`, created on first access.
    pub fn session(&self, session_id: &str) -> Result<Arc<Mutex<ConversationState>>> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| MemoryError::SessionPoisoned("<store>".to_string()))?;
        let handle = sessions.entry(session_id.to_string()).or_insert_with(|| {
            log::debug!("Starting conversation session {session_id}");
            Arc::new(Mutex::new(ConversationState::new()))
        });
        Ok(Arc::clone(handle))
    }

    /// Run `f` with exclusive access to the session's state.
    ///
    /// The message window is enforced before `f` runs, matching request-start
    /// eviction.
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut ConversationState, &MemoryConfig) -> R,
    ) -> Result<R> {
        let handle = self.session(session_id)?;
        let mut state = handle
            .lock()
            .map_err(|_| MemoryError::SessionPoisoned(session_id.to_string()))?;
        state.enforce_window(&self.config);
        Ok(f(&mut state, &self.config))
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions
            .lock()
            .map(|sessions| sessions.contains_key(session_id))
            .unwrap_or(false)
    }

    pub fn remove(&self, session_id: &str) -> Result<Option<ConversationState>> {
        let removed = self
            .sessions
            .lock()
            .map_err(|_| MemoryError::SessionPoisoned("<store>".to_string()))?
            .remove(session_id);
        match removed {
            Some(handle) => {
                let state = handle
                    .lock()
                    .map_err(|_| MemoryError::SessionPoisoned(session_id.to_string()))?;
                Ok(Some(state.clone()))
            }
            None => Ok(None),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
