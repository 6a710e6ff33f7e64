pub mod gemini;
pub mod ollama;

use async_trait::async_trait;

/// Prompt in, completion text out. The whole service treats the generative
/// model as this black box so tests can inject a deterministic stub.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
