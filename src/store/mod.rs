//! Reader traits for the engine's external collaborators, plus the
//! in-memory implementations used by the demo binary and the tests.
//!
//! The engine never owns persistence: it consumes a knowledge-base
//! snapshot and a chronological session history through these traits.
//! Production deployments back them with a database; here they are backed
//! by a JSON seed file and a mutex'd map.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;

use crate::types::{ConversationMessage, FaqEntry, Role};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("knowledge base read failed: {0}")]
    KnowledgeBase(String),
    #[error("history read failed: {0}")]
    History(String),
}

// ── Reader traits ─────────────────────────────────────────────────────────────

/// Read-only view of the FAQ knowledge base.
///
/// Iteration order must be stable across identical calls — the matcher's
/// tie-break (earliest entry wins) depends on it.
pub trait KnowledgeBaseReader: Send + Sync {
    fn list_all(&self) -> Result<Vec<FaqEntry>, StoreError>;
}

/// Read-only view of a session's message history, chronological ascending.
pub trait MessageHistoryReader: Send + Sync {
    fn for_session(&self, session_id: &str) -> Result<Vec<ConversationMessage>, StoreError>;
}

// Arc pass-throughs so a caller can keep a writer handle to the same
// store the engine reads from.
impl<T: KnowledgeBaseReader> KnowledgeBaseReader for std::sync::Arc<T> {
    fn list_all(&self) -> Result<Vec<FaqEntry>, StoreError> {
        (**self).list_all()
    }
}

impl<T: MessageHistoryReader> MessageHistoryReader for std::sync::Arc<T> {
    fn for_session(&self, session_id: &str) -> Result<Vec<ConversationMessage>, StoreError> {
        (**self).for_session(session_id)
    }
}

// ── In-memory knowledge base ──────────────────────────────────────────────────

/// Knowledge base held in memory, optionally seeded from a JSON file of
/// [`FaqEntry`] objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryKnowledgeBase {
    entries: Vec<FaqEntry>,
}

impl MemoryKnowledgeBase {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    /// Load entries from a JSON array file (e.g. `config/faqs.json`).
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| StoreError::KnowledgeBase(format!("cannot read {}: {e}", path.display())))?;
        let entries: Vec<FaqEntry> = serde_json::from_str(&data)
            .map_err(|e| StoreError::KnowledgeBase(format!("malformed {}: {e}", path.display())))?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KnowledgeBaseReader for MemoryKnowledgeBase {
    fn list_all(&self) -> Result<Vec<FaqEntry>, StoreError> {
        Ok(self.entries.clone())
    }
}

// ── In-memory history ─────────────────────────────────────────────────────────

/// Per-session message history held in memory.
///
/// The mutex stands in for the external store's consistency discipline:
/// concurrent appends to the same session serialize here, and the engine
/// only ever sees a finished snapshot.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    sessions: Mutex<HashMap<String, Vec<ConversationMessage>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current UTC time.
    pub fn append(&self, session_id: &str, role: Role, content: &str) -> Result<(), StoreError> {
        let msg = ConversationMessage::new(role, content, Utc::now());
        self.sessions
            .lock()
            .map_err(|_| StoreError::History("history mutex poisoned".into()))?
            .entry(session_id.to_string())
            .or_default()
            .push(msg);
        Ok(())
    }
}

impl MessageHistoryReader for MemoryHistory {
    fn for_session(&self, session_id: &str) -> Result<Vec<ConversationMessage>, StoreError> {
        let mut messages = self
            .sessions
            .lock()
            .map_err(|_| StoreError::History("history mutex poisoned".into()))?
            .get(session_id)
            .cloned()
            .unwrap_or_default();
        // Stable sort: equal timestamps keep insertion order, so a writer
        // stamping two messages in the same instant cannot reorder them.
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn kb_from_json_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(
            br#"[{"id": 1, "question": "q1", "answer": "a1"},
                 {"id": 2, "question": "q2", "answer": "a2"}]"#,
        )
        .unwrap();
        let kb = MemoryKnowledgeBase::from_json_file(f.path()).unwrap();
        assert_eq!(kb.len(), 2);
        let entries = kb.list_all().unwrap();
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[1].answer, "a2");
    }

    #[test]
    fn kb_missing_file_errors() {
        let err = MemoryKnowledgeBase::from_json_file(Path::new("/nonexistent/faqs.json"))
            .unwrap_err();
        assert!(err.to_string().contains("knowledge base read failed"));
    }

    #[test]
    fn kb_malformed_json_errors() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"{not json").unwrap();
        let err = MemoryKnowledgeBase::from_json_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn history_appends_in_order() {
        let h = MemoryHistory::new();
        h.append("s1", Role::User, "first").unwrap();
        h.append("s1", Role::Assistant, "second").unwrap();
        h.append("s2", Role::User, "other session").unwrap();

        let msgs = h.for_session("s1").unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].content, "first");
        assert_eq!(msgs[1].content, "second");
        assert!(msgs[0].timestamp <= msgs[1].timestamp);
    }

    #[test]
    fn history_unknown_session_is_empty() {
        let h = MemoryHistory::new();
        assert!(h.for_session("nope").unwrap().is_empty());
    }
}
