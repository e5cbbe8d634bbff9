//! Workflow state store - session-keyed, in-memory, ephemeral
//!
//! One record per session, created when the session starts the workflow and
//! removed when the session ends. The registry lock is held only to resolve
//! a session's entry; each record has its own mutex, so sessions mutate
//! independently while mutations within one session are serialized.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::types::{WorkflowError, WorkflowKind, WorkflowState};

type SessionMap = HashMap<String, Arc<Mutex<WorkflowState>>>;

/// Session-keyed registry of workflow states
#[derive(Clone, Default)]
pub struct WorkflowRegistry {
    sessions: Arc<RwLock<SessionMap>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a workflow for a session, idempotently
    ///
    /// Re-creating an existing session is a no-op that returns the existing
    /// state; progress is never silently reset.
    pub async fn create(
        &self,
        session_id: &str,
        kind: WorkflowKind,
        max_phases: u8,
    ) -> WorkflowState {
        let mut sessions = self.sessions.write().await;

        if let Some(existing) = sessions.get(session_id) {
            return existing.lock().await.clone();
        }

        let state = WorkflowState::new(session_id, kind, max_phases);
        sessions.insert(
            session_id.to_string(),
            Arc::new(Mutex::new(state.clone())),
        );

        tracing::info!(session_id, kind = %kind, "workflow created");
        state
    }

    /// Snapshot of a session's current state
    pub async fn get(&self, session_id: &str) -> Result<WorkflowState, WorkflowError> {
        let entry = self.entry(session_id).await?;
        let state = entry.lock().await;
        Ok(state.clone())
    }

    /// Apply a transition under the session's lock
    ///
    /// The closure runs against a working copy. On `Ok` the copy is
    /// committed and the updated snapshot returned; on `Err` nothing is
    /// mutated, so readers never observe a partial transition.
    pub async fn mutate<F, T>(
        &self,
        session_id: &str,
        f: F,
    ) -> Result<(WorkflowState, T), WorkflowError>
    where
        F: FnOnce(&mut WorkflowState) -> Result<T, WorkflowError>,
    {
        let entry = self.entry(session_id).await?;
        let mut state = entry.lock().await;

        let mut working = state.clone();
        let value = f(&mut working)?;
        *state = working.clone();

        Ok((working, value))
    }

    /// Remove a session's workflow; returns whether one existed
    pub async fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            tracing::info!(session_id, "workflow removed");
        }
        removed
    }

    /// Number of live workflows
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Session ids with live workflows
    pub async fn session_ids(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    async fn entry(&self, session_id: &str) -> Result<Arc<Mutex<WorkflowState>>, WorkflowError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownSession(session_id.to_string()))
    }
}
