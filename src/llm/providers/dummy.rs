//! Dummy generation provider — echoes the prompt back prefixed with `[echo]`.
//! Used for tests and offline runs without a real API key.

use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        Ok(format!("[echo] {prompt}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_prefixes_echo() {
        let p = DummyProvider;
        assert_eq!(p.generate("hello").await.unwrap(), "[echo] hello");
    }

    #[tokio::test]
    async fn generate_empty_input() {
        let p = DummyProvider;
        assert_eq!(p.generate("").await.unwrap(), "[echo] ");
    }
}
