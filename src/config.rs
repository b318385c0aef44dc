//! Startup configuration from command-line flags and the environment.

use std::time::Duration;

use clap::Parser;

use crate::{backends::groq::Groq, error::PersonaError};

/// Command line arguments for the PersonaAI server
#[derive(Parser, Debug, Clone)]
#[command(
    name = "persona-ai",
    about = "Chat with a hosted LLM under selectable persona modes"
)]
pub struct Config {
    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "PERSONA_BASE_URL")]
    pub base_url: Option<String>,

    /// Model name to use
    #[arg(long, env = "PERSONA_MODEL")]
    pub model: Option<String>,

    /// Address the web UI listens on
    #[arg(long, env = "PERSONA_BIND", default_value = "127.0.0.1:8501")]
    pub bind: String,

    /// Per-request timeout for completion calls
    #[arg(long, env = "PERSONA_TIMEOUT_SECONDS", default_value_t = 60)]
    pub timeout_seconds: u64,

    /// Maximum tokens in each reply
    #[arg(long, env = "PERSONA_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Temperature setting (0.0-1.0)
    #[arg(long, env = "PERSONA_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Minutes a session may stay unused before it is discarded
    #[arg(long, env = "PERSONA_SESSION_IDLE_MINUTES", default_value_t = 120)]
    pub session_idle_minutes: u64,
}

impl Config {
    /// Returns the API key, or a configuration error when it is missing or blank.
    pub fn validate(&self) -> Result<&str, PersonaError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(PersonaError::Configuration(
                "GROQ_API_KEY is not set; export it or pass --api-key".into(),
            )),
        }
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes.saturating_mul(60))
    }

    /// Builds the Groq completion client from this configuration.
    pub fn build_provider(&self) -> Result<Groq, PersonaError> {
        let key = self.validate()?;
        Groq::new(
            key,
            self.base_url.clone(),
            self.model.clone(),
            self.max_tokens,
            self.temperature,
            Some(self.timeout_seconds),
        )
    }
}
