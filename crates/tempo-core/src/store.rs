use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tempo_storage::{Database, SessionKind};
use uuid::Uuid;

use crate::session::HistoryEntry;

/// Where completed sessions go
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist one completed session for a profile
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects or cannot perform the write
    async fn record_session(
        &self,
        profile_id: Uuid,
        kind: SessionKind,
        duration_seconds: u64,
    ) -> Result<()>;

    /// All sessions of a profile, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails
    async fn list_sessions(&self, profile_id: Uuid) -> Result<Vec<HistoryEntry>>;
}

#[async_trait]
impl SessionStore for Database {
    async fn record_session(
        &self,
        profile_id: Uuid,
        kind: SessionKind,
        duration_seconds: u64,
    ) -> Result<()> {
        self.add_time_record(profile_id, kind, duration_seconds)?;
        Ok(())
    }

    async fn list_sessions(&self, profile_id: Uuid) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .get_time_records(profile_id, None)?
            .into_iter()
            .map(HistoryEntry::from)
            .collect())
    }
}

/// Volatile store keeping sessions in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<Uuid, Vec<HistoryEntry>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn record_session(
        &self,
        profile_id: Uuid,
        kind: SessionKind,
        duration_seconds: u64,
    ) -> Result<()> {
        anyhow::ensure!(duration_seconds > 0, "session duration must be positive");
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(profile_id)
            .or_default()
            .insert(0, HistoryEntry::new(kind, duration_seconds));
        Ok(())
    }

    async fn list_sessions(&self, profile_id: Uuid) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&profile_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_lists_most_recent_first() {
        let store = MemoryStore::new();
        let profile = Uuid::new_v4();

        store.record_session(profile, SessionKind::Work, 125).await.unwrap();
        store.record_session(profile, SessionKind::Leisure, 30).await.unwrap();

        let sessions = store.list_sessions(profile).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].kind, SessionKind::Leisure);
        assert_eq!(sessions[1].duration_seconds, 125);
        assert!(store.list_sessions(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_rejects_zero_duration() {
        let store = MemoryStore::new();
        assert!(store
            .record_session(Uuid::new_v4(), SessionKind::Work, 0)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_database_store() {
        let db = Database::open_in_memory().unwrap();
        let profile = db.create_profile("ana").unwrap();

        db.record_session(profile.id, SessionKind::Work, 90).await.unwrap();
        let sessions = db.list_sessions(profile.id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].kind, SessionKind::Work);
        assert_eq!(sessions[0].duration_seconds, 90);
    }
}
