//! Text-generation provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations —
//! enum dispatch avoids `dyn` trait objects and the `async-trait`
//! dependency. Adding a backend = new module + new variant + new
//! `generate` arm.
//!
//! Generation is the only fallible operation in the whole reply path;
//! [`ProviderError`] is the distinct failure signal the engine surfaces
//! to its caller instead of swallowing.

pub mod providers;

use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available generation backends.
///
/// Provider instances are shared immutable capabilities — clone them freely.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// Send `prompt` to the provider and return its raw text output.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.generate(prompt).await,
            LlmProvider::OpenAiCompatible(p) => p.generate(prompt).await,
        }
    }
}
