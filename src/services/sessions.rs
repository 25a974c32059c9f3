//! In-memory booking sessions.
//!
//! Sessions untouched for longer than the idle timeout are evicted whenever a
//! new session starts, so abandoned page loads do not accumulate.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{FlowError, FlowStage};

struct Session {
    stage: FlowStage,
    last_seen: Instant,
}

pub struct SessionStore {
    idle_timeout: Duration,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, AppError> {
        self.sessions
            .lock()
            .map_err(|_| AppError::Internal("session store poisoned".to_string()))
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("booking session {id}"))
    }

    /// Evicts idle sessions, then opens a new one in the default stage.
    pub fn start(&self) -> Result<(Uuid, FlowStage), AppError> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, s| s.last_seen.elapsed() < idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = sessions.len(), "evicted idle sessions");
        }

        let id = Uuid::new_v4();
        let stage = FlowStage::default();
        sessions.insert(
            id,
            Session {
                stage: stage.clone(),
                last_seen: Instant::now(),
            },
        );
        Ok((id, stage))
    }

    pub fn get(&self, id: Uuid) -> Result<FlowStage, AppError> {
        let mut sessions = self.lock()?;
        let session = sessions.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        session.last_seen = Instant::now();
        Ok(session.stage.clone())
    }

    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.lock()?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }

    /// Replaces the stage of `id` with `f(stage)` under the lock. The stored
    /// stage is left as is when `f` fails.
    pub fn update<F>(&self, id: Uuid, f: F) -> Result<(FlowStage, FlowStage), AppError>
    where
        F: FnOnce(&FlowStage) -> Result<FlowStage, FlowError>,
    {
        let mut sessions = self.lock()?;
        let session = sessions.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        let next = f(&session.stage)?;
        let previous = std::mem::replace(&mut session.stage, next.clone());
        session.last_seen = Instant::now();
        Ok((previous, next))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
