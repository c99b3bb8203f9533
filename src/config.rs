//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `FAQDESK_LOG_LEVEL`. The LLM API key comes only from the
//! `LLM_API_KEY` env var, never from TOML.
//!
//! All retrieval constants (embedding dimension, confidence threshold,
//! context window, escalation keywords) and the fixed prompt preambles
//! live here so nothing in the engine is an ambient global.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

// ── Resolved config ───────────────────────────────────────────────────────────

/// Retrieval and escalation constants, from `[retrieval]`.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Embedding dimension D — fixed per deployment.
    pub embedding_dim: usize,
    /// Minimum match score for a verbatim FAQ answer. A score exactly at
    /// the threshold takes the direct-answer path.
    pub confidence_threshold: f32,
    /// Maximum number of recent messages rendered into the prompt.
    pub context_window: usize,
    /// Case-insensitive substrings that mark a generated reply as needing
    /// a human agent.
    pub escalation_keywords: Vec<String>,
}

/// Fixed instruction preambles, from `[prompts]`.
#[derive(Debug, Clone)]
pub struct PromptsConfig {
    /// Prepended to the context window when generating a reply.
    pub reply_preamble: String,
    /// Prepended to the full transcript when summarizing a session.
    pub summary_preamble: String,
}

/// OpenAI / OpenAI-compatible provider configuration (`[llm.openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM provider configuration (`[llm]`).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"dummy"` or `"openai"`). Maps to
    /// `default` in the TOML so other provider sections can coexist.
    pub provider: String,
    pub openai: OpenAiConfig,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    pub log_level: String,
    /// Path to the JSON knowledge-base seed used by the demo binary.
    pub faq_seed_path: String,
    pub retrieval: RetrievalConfig,
    pub prompts: PromptsConfig,
    pub llm: LlmConfig,
    /// From `LLM_API_KEY` env — `None` for keyless/dummy providers.
    pub llm_api_key: Option<String>,
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawConfig {
    bot: RawBot,
    #[serde(default)]
    retrieval: RawRetrieval,
    #[serde(default)]
    prompts: RawPrompts,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawBot {
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_faq_seed_path")]
    faq_seed_path: String,
}

#[derive(Deserialize)]
struct RawRetrieval {
    #[serde(default = "default_embedding_dim")]
    embedding_dim: usize,
    #[serde(default = "default_confidence_threshold")]
    confidence_threshold: f32,
    #[serde(default = "default_context_window")]
    context_window: usize,
    #[serde(default = "default_escalation_keywords")]
    escalation_keywords: Vec<String>,
}

impl Default for RawRetrieval {
    fn default() -> Self {
        Self {
            embedding_dim: default_embedding_dim(),
            confidence_threshold: default_confidence_threshold(),
            context_window: default_context_window(),
            escalation_keywords: default_escalation_keywords(),
        }
    }
}

#[derive(Deserialize)]
struct RawPrompts {
    #[serde(default = "default_reply_preamble")]
    reply_preamble: String,
    #[serde(default = "default_summary_preamble")]
    summary_preamble: String,
}

impl Default for RawPrompts {
    fn default() -> Self {
        Self {
            reply_preamble: default_reply_preamble(),
            summary_preamble: default_summary_preamble(),
        }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_temperature")]
    temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

// ── Defaults ──────────────────────────────────────────────────────────────────

fn default_log_level() -> String { "info".to_string() }
fn default_faq_seed_path() -> String { "config/faqs.json".to_string() }

fn default_embedding_dim() -> usize { 64 }
fn default_confidence_threshold() -> f32 { 0.75 }
fn default_context_window() -> usize { 8 }

fn default_escalation_keywords() -> Vec<String> {
    ["not sure", "cannot", "uncertain", "escalate", "contact support", "agent"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_reply_preamble() -> String {
    "You are a helpful support assistant. If confident, answer succinctly. \
     If unsure or missing data, recommend escalation to a human agent and propose next steps."
        .to_string()
}

fn default_summary_preamble() -> String {
    "Summarize the following customer support conversation in 3-5 bullet points, \
     include customer issue, resolutions attempted, and next actions."
        .to_string()
}

fn default_llm_provider() -> String { "dummy".to_string() }
fn default_openai_api_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_openai_temperature() -> f32 { 0.2 }
fn default_openai_timeout_seconds() -> u64 { 60 }

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let log_level_override = env::var("FAQDESK_LOG_LEVEL").ok();
    load_from(Path::new("config/default.toml"), log_level_override.as_deref())
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, log_level_override: Option<&str>) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    if parsed.retrieval.embedding_dim == 0 {
        return Err(AppError::Config("embedding_dim must be at least 1".into()));
    }
    if parsed.retrieval.context_window == 0 {
        return Err(AppError::Config("context_window must be at least 1".into()));
    }

    let log_level = log_level_override
        .unwrap_or(&parsed.bot.log_level)
        .to_string();

    Ok(Config {
        bot_name: parsed.bot.name,
        log_level,
        faq_seed_path: parsed.bot.faq_seed_path,
        retrieval: RetrievalConfig {
            embedding_dim: parsed.retrieval.embedding_dim,
            confidence_threshold: parsed.retrieval.confidence_threshold,
            context_window: parsed.retrieval.context_window,
            escalation_keywords: parsed.retrieval.escalation_keywords,
        },
        prompts: PromptsConfig {
            reply_preamble: parsed.prompts.reply_preamble,
            summary_preamble: parsed.prompts.summary_preamble,
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        llm_api_key: env::var("LLM_API_KEY").ok(),
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy LLM, no API keys, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            bot_name: "test".into(),
            log_level: "info".into(),
            faq_seed_path: default_faq_seed_path(),
            retrieval: RetrievalConfig {
                embedding_dim: default_embedding_dim(),
                confidence_threshold: default_confidence_threshold(),
                context_window: default_context_window(),
                escalation_keywords: default_escalation_keywords(),
            },
            prompts: PromptsConfig {
                reply_preamble: default_reply_preamble(),
                summary_preamble: default_summary_preamble(),
            },
            llm: LlmConfig {
                provider: "dummy".into(),
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    timeout_seconds: 1,
                },
            },
            llm_api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[bot]
name = "test-bot"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_minimal_config_gets_defaults() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None).unwrap();
        assert_eq!(cfg.bot_name, "test-bot");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.retrieval.embedding_dim, 64);
        assert_eq!(cfg.retrieval.confidence_threshold, 0.75);
        assert_eq!(cfg.retrieval.context_window, 8);
        assert_eq!(cfg.retrieval.escalation_keywords.len(), 6);
        assert_eq!(cfg.llm.provider, "dummy");
        assert_eq!(cfg.llm.openai.model, "gpt-4o-mini");
    }

    #[test]
    fn retrieval_section_overrides() {
        let f = write_toml(
            r#"
[bot]
name = "t"

[retrieval]
embedding_dim = 32
confidence_threshold = 0.9
context_window = 4
escalation_keywords = ["handoff"]
"#,
        );
        let cfg = load_from(f.path(), None).unwrap();
        assert_eq!(cfg.retrieval.embedding_dim, 32);
        assert_eq!(cfg.retrieval.confidence_threshold, 0.9);
        assert_eq!(cfg.retrieval.context_window, 4);
        assert_eq!(cfg.retrieval.escalation_keywords, vec!["handoff".to_string()]);
    }

    #[test]
    fn zero_embedding_dim_rejected() {
        let f = write_toml("[bot]\nname = \"t\"\n\n[retrieval]\nembedding_dim = 0\n");
        assert!(load_from(f.path(), None).is_err());
    }

    #[test]
    fn zero_context_window_rejected() {
        let f = write_toml("[bot]\nname = \"t\"\n\n[retrieval]\ncontext_window = 0\n");
        assert!(load_from(f.path(), None).is_err());
    }

    #[test]
    fn log_level_override_applies() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), Some("debug")).unwrap();
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("config error"));
    }

    #[test]
    fn default_preambles_match_fixed_instructions() {
        let cfg = Config::test_default();
        assert!(cfg.prompts.reply_preamble.contains("helpful support assistant"));
        assert!(cfg.prompts.summary_preamble.contains("3-5 bullet points"));
    }
}
