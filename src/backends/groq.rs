//! Groq API client implementation for chat functionality.
//!
//! Groq exposes an OpenAI-compatible endpoint, so this is only a configuration
//! of the generic provider.

use crate::providers::openai_compatible::{OpenAICompatibleConfig, OpenAICompatibleProvider};

/// Groq configuration for the generic provider
pub struct GroqConfig;

impl OpenAICompatibleConfig for GroqConfig {
    const PROVIDER_NAME: &'static str = "Groq";
    const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1/";
    const DEFAULT_MODEL: &'static str = "llama-3.1-8b-instant";
}

pub type Groq = OpenAICompatibleProvider<GroqConfig>;

#[cfg(test)]
const LLM_API_KEY_ENV: &str = "GROQ_API_KEY";

#[tokio::test]
async fn test_groq_complete_live() -> Result<(), Box<dyn std::error::Error>> {
    use crate::{chat::ChatMessage, completion::CompletionProvider};

    let api_key = match std::env::var(LLM_API_KEY_ENV) {
        Ok(key) => key,
        Err(_) => {
            eprintln!("test test_groq_complete_live ... ignored, {LLM_API_KEY_ENV} not set");
            return Ok(());
        }
    };
    let llm = Groq::new(api_key, None, None, Some(64), Some(0.7), Some(30))?;
    let history = vec![ChatMessage::user().content("Hello.").build()];
    let reply = llm
        .complete(crate::mode::Mode::Chat.system_prompt(), &history)
        .await?;
    assert!(!reply.is_empty(), "Expected response message, got empty text");
    Ok(())
}

#[test]
fn test_groq_defaults() {
    use crate::completion::CompletionProvider;

    let llm = Groq::new("key", None, None, None, None, None).expect("default config is valid");
    assert_eq!(llm.model(), "llama-3.1-8b-instant");
    assert_eq!(llm.base_url.as_str(), "https://api.groq.com/openai/v1/");
}
