// Library root — exposes internals for integration tests and crate consumers.
// The binary entry point is src/main.rs.

pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod logger;
pub mod store;
pub mod types;

pub use engine::{EngineError, SupportEngine, EMPTY_SESSION_SUMMARY};
pub use types::{ConversationMessage, FaqEntry, MatchResult, ReplyDecision, Role};
