//! Core value types shared across the engine, stores, and providers.
//!
//! Everything here is a plain data carrier: the engine treats FAQ entries
//! and conversation messages as externally-owned, read-only inputs and
//! produces [`MatchResult`] / [`ReplyDecision`] values from them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Knowledge base ────────────────────────────────────────────────────────────

/// A stored question/answer pair usable as a canned response.
///
/// Immutable and externally owned — the engine only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: u64,
    pub question: String,
    pub answer: String,
}

// ── Conversation ──────────────────────────────────────────────────────────────

/// Who authored a conversation message.
///
/// `Display` renders the lowercase wire name (`user`, `assistant`,
/// `system`) used in transcripts and prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(s)
    }
}

/// A single message in a session, ordered by `timestamp` ascending.
///
/// Append-only: the message store owns the history and hands the engine a
/// chronological snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { role, content: content.into(), timestamp }
    }

    /// Render as a `"role: content"` transcript line.
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}

// ── Engine outputs ────────────────────────────────────────────────────────────

/// Outcome of matching a query against the knowledge base.
///
/// `faq_id` is `None` only for an empty knowledge base; absence of a match
/// is never an error. `score` is the true best cosine similarity — the
/// confidence threshold is applied by the caller, not the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    pub faq_id: Option<u64>,
    pub score: f32,
}

impl MatchResult {
    /// The empty-knowledge-base result.
    pub fn none() -> Self {
        Self { faq_id: None, score: 0.0 }
    }
}

/// The engine's answer to one user utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyDecision {
    /// Verbatim FAQ answer or raw generated text.
    pub text: String,
    /// Whether the conversation should be handed to a human agent.
    pub escalated: bool,
    /// Best-matching FAQ id. Set even when the score fell below the
    /// confidence threshold — reported as a related-article hint, not as
    /// the answer source.
    pub faq_match_id: Option<u64>,
}
