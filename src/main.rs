//! faqdesk — customer-support chatbot demo.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Build the generation provider and seed the knowledge base
//!   5. Run a console loop: each line is a user message, `/summary`
//!      prints the session summary, `/quit` exits

mod config;
mod engine;
mod error;
mod llm;
mod logger;
mod store;
mod types;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use engine::{EngineError, SupportEngine};
use error::AppError;
use store::{MemoryHistory, MemoryKnowledgeBase};
use types::{ReplyDecision, Role};

/// Degraded reply used when generation keeps failing after the retry.
const APOLOGY_REPLY: &str =
    "I'm sorry, I'm having trouble responding right now. Let me connect you with a human agent.";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::parse_level(&config.log_level)?;
    logger::init(&config.log_level)?;

    info!(
        bot_name = %config.bot_name,
        provider = %config.llm.provider,
        embedding_dim = config.retrieval.embedding_dim,
        confidence_threshold = config.retrieval.confidence_threshold,
        "config loaded"
    );

    let provider = llm::providers::build(&config.llm, config.llm_api_key.clone())
        .map_err(|e| AppError::Config(format!("llm provider: {e}")))?;

    let kb = MemoryKnowledgeBase::from_json_file(Path::new(&config.faq_seed_path))
        .map_err(|e| AppError::Store(e.to_string()))?;
    info!(entries = kb.len(), seed = %config.faq_seed_path, "knowledge base loaded");

    let history = Arc::new(MemoryHistory::new());
    let engine = SupportEngine::new(
        config.retrieval.clone(),
        config.prompts.clone(),
        provider,
        kb,
        history.clone(),
    );

    let session_id = Uuid::new_v4().to_string();
    println!("✓ {} ready (session {session_id})", config.bot_name);
    println!("  type a message, /summary for a session summary, /quit to exit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" => break,
            "/summary" => match engine.summarize(&session_id).await {
                Ok(summary) => println!("{summary}"),
                Err(EngineError::Generation(e)) => {
                    warn!(error = %e, "summary generation failed");
                    println!("(summary unavailable right now)");
                }
                Err(EngineError::Store(e)) => return Err(AppError::Store(e.to_string())),
            },
            text => {
                history
                    .append(&session_id, Role::User, text)
                    .map_err(|e| AppError::Store(e.to_string()))?;

                let decision = reply_with_retry(&engine, &session_id, text).await?;

                history
                    .append(&session_id, Role::Assistant, &decision.text)
                    .map_err(|e| AppError::Store(e.to_string()))?;

                println!("{}", decision.text);
                if decision.escalated {
                    println!("(escalated to a human agent)");
                }
                if let Some(id) = decision.faq_match_id {
                    println!("(related FAQ #{id})");
                }
            }
        }
    }

    Ok(())
}

/// One bounded retry on generation failure, then the fixed apology reply.
///
/// Store failures propagate immediately — only the generation step is
/// retryable.
async fn reply_with_retry<K, H>(
    engine: &SupportEngine<K, H>,
    session_id: &str,
    text: &str,
) -> Result<ReplyDecision, AppError>
where
    K: store::KnowledgeBaseReader,
    H: store::MessageHistoryReader,
{
    match engine.reply(session_id, text).await {
        Ok(d) => Ok(d),
        Err(EngineError::Store(e)) => Err(AppError::Store(e.to_string())),
        Err(EngineError::Generation(e)) => {
            warn!(error = %e, "generation failed, retrying once");
            tokio::time::sleep(Duration::from_millis(500)).await;
            match engine.reply(session_id, text).await {
                Ok(d) => Ok(d),
                Err(EngineError::Store(e)) => Err(AppError::Store(e.to_string())),
                Err(EngineError::Generation(e)) => {
                    warn!(error = %e, "generation failed again, sending degraded reply");
                    Ok(ReplyDecision {
                        text: APOLOGY_REPLY.to_string(),
                        escalated: true,
                        faq_match_id: None,
                    })
                }
            }
        }
    }
}
