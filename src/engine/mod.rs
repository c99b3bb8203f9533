//! Retrieval-and-response engine.
//!
//! [`SupportEngine`] decides, per user utterance, whether a stored FAQ
//! answer can be returned verbatim or a generated reply is needed, and
//! whether the conversation should escalate to a human. It also produces
//! session summaries.
//!
//! ```text
//! reply(session, text)
//!     ├─ best_match over KB snapshot
//!     ├─ score ≥ threshold → verbatim FAQ answer (no generation call)
//!     └─ else → context window → prompt → LlmProvider::generate
//!                                   └─ keyword scan → escalated flag
//! ```
//!
//! Every step except the provider call is a synchronous pure function of
//! its inputs; the engine holds no mutable state and concurrent calls for
//! different sessions are fully independent.

pub mod context;
pub mod embedding;
pub mod matcher;
pub mod similarity;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{PromptsConfig, RetrievalConfig};
use crate::llm::{LlmProvider, ProviderError};
use crate::store::{KnowledgeBaseReader, MessageHistoryReader, StoreError};
use crate::types::{MatchResult, ReplyDecision};

use embedding::Embedder;

/// Fixed sentinel returned when summarizing a session with no messages.
pub const EMPTY_SESSION_SUMMARY: &str = "No messages in this session.";

// ── Error ─────────────────────────────────────────────────────────────────────

/// Failures an engine call can surface.
///
/// Matching and scoring are total pure functions and never fail; an empty
/// knowledge base or empty history is a value, not an error. Generation
/// is the only operation allowed to fail and keeps its own variant so the
/// caller can retry or substitute a degraded reply.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("generation failed: {0}")]
    Generation(#[from] ProviderError),
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// The retrieval-and-response core, parameterised over its collaborators.
///
/// Readers are injected so production deployments can back them with a
/// database while tests and the demo use the in-memory stores.
pub struct SupportEngine<K, H> {
    retrieval: RetrievalConfig,
    prompts: PromptsConfig,
    embedder: Embedder,
    provider: LlmProvider,
    kb: K,
    history: H,
}

impl<K, H> SupportEngine<K, H>
where
    K: KnowledgeBaseReader,
    H: MessageHistoryReader,
{
    /// Build an engine with the placeholder hash embedder at the
    /// configured dimension.
    pub fn new(
        retrieval: RetrievalConfig,
        prompts: PromptsConfig,
        provider: LlmProvider,
        kb: K,
        history: H,
    ) -> Self {
        let embedder = Embedder::hash(retrieval.embedding_dim);
        Self::with_embedder(retrieval, prompts, embedder, provider, kb, history)
    }

    /// Build an engine with an explicit embedding backend.
    pub fn with_embedder(
        retrieval: RetrievalConfig,
        prompts: PromptsConfig,
        embedder: Embedder,
        provider: LlmProvider,
        kb: K,
        history: H,
    ) -> Self {
        Self { retrieval, prompts, embedder, provider, kb, history }
    }

    /// Match `query` against the knowledge base and return the best entry
    /// with its true score — no thresholding here.
    pub fn match_faq(&self, query: &str) -> Result<MatchResult, EngineError> {
        let entries = self.kb.list_all()?;
        Ok(matcher::best_match(&self.embedder, query, &entries))
    }

    /// Answer one user utterance for `session_id`.
    ///
    /// The session history must already contain the just-recorded user
    /// message. A match at or above the confidence threshold returns the
    /// stored answer verbatim without a generation call; otherwise the
    /// reply is generated from the bounded context window and scanned for
    /// escalation keywords. The best-match FAQ id is reported either way
    /// (below threshold it is a weak related-article hint, not the answer
    /// source).
    pub async fn reply(
        &self,
        session_id: &str,
        user_text: &str,
    ) -> Result<ReplyDecision, EngineError> {
        let entries = self.kb.list_all()?;
        let matched = matcher::best_match(&self.embedder, user_text, &entries);

        debug!(
            session_id = %session_id,
            faq_id = ?matched.faq_id,
            score = matched.score,
            "knowledge base matched"
        );

        if matched.score >= self.retrieval.confidence_threshold {
            if let Some(entry) = entries.iter().find(|e| Some(e.id) == matched.faq_id) {
                info!(session_id = %session_id, faq_id = entry.id, "direct FAQ answer");
                return Ok(ReplyDecision {
                    text: entry.answer.clone(),
                    escalated: false,
                    faq_match_id: matched.faq_id,
                });
            }
        }

        let history = self.history.for_session(session_id)?;
        let ctx = context::build_context(&history, self.retrieval.context_window);
        let prompt = reply_prompt(&self.prompts.reply_preamble, &ctx, user_text);

        let raw = self.provider.generate(&prompt).await?;
        let escalated = contains_escalation_keyword(&raw, &self.retrieval.escalation_keywords);

        info!(
            session_id = %session_id,
            escalated,
            related_faq = ?matched.faq_id,
            "generated reply"
        );

        Ok(ReplyDecision { text: raw, escalated, faq_match_id: matched.faq_id })
    }

    /// Summarize the full session history.
    ///
    /// An empty session returns [`EMPTY_SESSION_SUMMARY`] verbatim with no
    /// generation call; otherwise the provider's raw output is returned
    /// unmodified.
    pub async fn summarize(&self, session_id: &str) -> Result<String, EngineError> {
        let history = self.history.for_session(session_id)?;
        if history.is_empty() {
            return Ok(EMPTY_SESSION_SUMMARY.to_string());
        }

        let transcript = context::render_transcript(&history);
        let prompt = summary_prompt(&self.prompts.summary_preamble, &transcript);

        info!(session_id = %session_id, messages = history.len(), "summarizing session");
        Ok(self.provider.generate(&prompt).await?)
    }
}

// ── Pure helpers ──────────────────────────────────────────────────────────────

/// Case-insensitive substring scan for any escalation keyword.
pub fn contains_escalation_keyword(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}

fn reply_prompt(preamble: &str, context: &str, user_text: &str) -> String {
    format!("{preamble}\n\nConversation so far:\n{context}\n\nUser: {user_text}\nAssistant:")
}

fn summary_prompt(preamble: &str, transcript: &str) -> String {
    format!("{preamble}\n\n{transcript}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        ["not sure", "cannot", "uncertain", "escalate", "contact support", "agent"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn each_keyword_triggers_escalation() {
        let kws = keywords();
        for k in &kws {
            let text = format!("prefix {k} suffix");
            assert!(
                contains_escalation_keyword(&text, &kws),
                "keyword '{k}' should trigger"
            );
        }
    }

    #[test]
    fn escalation_scan_is_case_insensitive() {
        let kws = keywords();
        assert!(contains_escalation_keyword("Please Contact Support for help", &kws));
        assert!(contains_escalation_keyword("I am NOT SURE about that", &kws));
        assert!(contains_escalation_keyword("ESCALATE immediately", &kws));
    }

    #[test]
    fn substring_match_counts() {
        let kws = keywords();
        // "agent" inside "agents" still trips the scan — substring, not word match.
        assert!(contains_escalation_keyword("our agents will call you", &kws));
    }

    #[test]
    fn clean_text_does_not_escalate() {
        let kws = keywords();
        assert!(!contains_escalation_keyword("Your order ships tomorrow.", &kws));
        assert!(!contains_escalation_keyword("", &kws));
    }

    #[test]
    fn reply_prompt_assembles_all_parts() {
        let p = reply_prompt("PREAMBLE", "user: hi\nassistant: hello", "where is my order?");
        assert!(p.starts_with("PREAMBLE"));
        assert!(p.contains("Conversation so far:\nuser: hi\nassistant: hello"));
        assert!(p.ends_with("User: where is my order?\nAssistant:"));
    }

    #[test]
    fn summary_prompt_wraps_transcript() {
        let p = summary_prompt("SUMMARIZE", "user: a\nassistant: b");
        assert!(p.starts_with("SUMMARIZE\n\n"));
        assert!(p.ends_with("user: a\nassistant: b"));
    }
}
