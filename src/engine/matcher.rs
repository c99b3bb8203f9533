//! FAQ matching — stable argmax over a knowledge-base snapshot.

use crate::engine::embedding::Embedder;
use crate::engine::similarity::cosine;
use crate::types::{FaqEntry, MatchResult};

/// Find the best-scoring entry for `query` over `entries`.
///
/// An empty knowledge base yields `{faq_id: None, score: 0.0}` — absence
/// of a match is a value, never an error. Otherwise the query is embedded
/// once and each entry's question scored against it; the strictly-greater
/// comparison keeps the earliest-seen entry on ties, so results are
/// stable across identical calls as long as the reader's iteration order
/// is.
///
/// The returned score is the true maximum regardless of any confidence
/// threshold — thresholding is the caller's concern.
pub fn best_match(embedder: &Embedder, query: &str, entries: &[FaqEntry]) -> MatchResult {
    if entries.is_empty() {
        return MatchResult::none();
    }

    let query_vec = embedder.embed(query);
    let mut best_id = None;
    let mut best_score = f32::NEG_INFINITY;

    for entry in entries {
        let question_vec = embedder.embed(&entry.question);
        let score = cosine(&query_vec, &question_vec);
        if score > best_score {
            best_id = Some(entry.id);
            best_score = score;
        }
    }

    MatchResult { faq_id: best_id, score: best_score }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, question: &str) -> FaqEntry {
        FaqEntry { id, question: question.into(), answer: format!("answer {id}") }
    }

    #[test]
    fn empty_kb_yields_no_match() {
        let e = Embedder::hash(64);
        let m = best_match(&e, "anything", &[]);
        assert_eq!(m.faq_id, None);
        assert_eq!(m.score, 0.0);
    }

    #[test]
    fn identical_question_scores_one() {
        let e = Embedder::hash(64);
        let kb = vec![
            entry(1, "How do I reset my password?"),
            entry(2, "What are your support hours?"),
        ];
        let m = best_match(&e, "What are your support hours?", &kb);
        assert_eq!(m.faq_id, Some(2));
        assert!((m.score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn score_equals_brute_force_maximum() {
        let e = Embedder::hash(64);
        let kb = vec![
            entry(10, "refund policy"),
            entry(11, "shipping times"),
            entry(12, "cancel subscription"),
            entry(13, "change email address"),
        ];
        let query = "how long does shipping take";
        let m = best_match(&e, query, &kb);

        let qv = e.embed(query);
        let max = kb
            .iter()
            .map(|f| cosine(&qv, &e.embed(&f.question)))
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(m.score, max);
    }

    #[test]
    fn tie_keeps_earliest_entry() {
        let e = Embedder::hash(64);
        // Duplicate questions embed identically, so their scores tie exactly.
        let kb = vec![
            entry(7, "duplicate question"),
            entry(8, "duplicate question"),
        ];
        let m = best_match(&e, "duplicate question", &kb);
        assert_eq!(m.faq_id, Some(7));
    }

    #[test]
    fn single_entry_always_wins() {
        let e = Embedder::hash(64);
        let kb = vec![entry(42, "only question")];
        let m = best_match(&e, "completely unrelated text", &kb);
        assert_eq!(m.faq_id, Some(42));
    }
}
