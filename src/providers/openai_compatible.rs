//! OpenAI-compatible API client base implementation
//!
//! This module provides a generic base for chat-completion APIs that speak the
//! OpenAI wire format. Providers customize it through [`OpenAICompatibleConfig`].

use crate::{
    chat::{ChatMessage, ChatRole},
    completion::CompletionProvider,
    error::{PersonaError, TransportError},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Generic OpenAI-compatible provider
///
/// Different providers customize behavior by implementing the `OpenAICompatibleConfig` trait.
pub struct OpenAICompatibleProvider<T: OpenAICompatibleConfig> {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
    pub client: Client,
    _phantom: PhantomData<T>,
}

/// Configuration trait for OpenAI-compatible providers
pub trait OpenAICompatibleConfig: Send + Sync {
    /// The name of the provider (e.g., "Groq")
    const PROVIDER_NAME: &'static str;

    /// Default base URL for the provider
    const DEFAULT_BASE_URL: &'static str;

    /// Default model for the provider
    const DEFAULT_MODEL: &'static str;

    /// Chat completions endpoint path (usually "chat/completions")
    const CHAT_ENDPOINT: &'static str = "chat/completions";
}

/// Generic OpenAI-compatible chat message
#[derive(Serialize, Debug)]
pub struct OpenAICompatibleChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Generic OpenAI-compatible chat request
#[derive(Serialize, Debug)]
pub struct OpenAICompatibleChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<OpenAICompatibleChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

/// Generic OpenAI-compatible chat response
#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatResponse {
    pub choices: Vec<OpenAICompatibleChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatChoice {
    pub message: OpenAICompatibleChatMsg,
}

#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatMsg {
    pub role: String,
    pub content: Option<String>,
}

/// Usage metadata for a chat response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl OpenAICompatibleChatResponse {
    /// Text of the first choice, if the provider sent any.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

fn api_message(msg: &ChatMessage) -> OpenAICompatibleChatMessage<'_> {
    OpenAICompatibleChatMessage {
        role: msg.role.as_str(),
        content: &msg.content,
    }
}

/// Maps a non-success HTTP status onto the transport error taxonomy.
fn status_error(provider: &str, status: StatusCode, body: String) -> TransportError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TransportError::Auth(format!("{provider} rejected the API key ({status}): {body}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            TransportError::RateLimited(format!("{provider} rate limit reached: {body}"))
        }
        _ => TransportError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

impl<T: OpenAICompatibleConfig> OpenAICompatibleProvider<T> {
    /// Creates a client. Fails with a configuration error when the base URL
    /// does not parse or the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, PersonaError> {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(sec));
        }

        // `Url::join` replaces the last path segment unless the base ends in '/'
        let mut base = base_url.unwrap_or_else(|| T::DEFAULT_BASE_URL.to_owned());
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            PersonaError::Configuration(format!(
                "invalid {} base URL '{base}': {e}",
                T::PROVIDER_NAME
            ))
        })?;

        let client = builder.build().map_err(|e| {
            PersonaError::Configuration(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            model: model.unwrap_or_else(|| T::DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            timeout_seconds,
            client,
            _phantom: PhantomData,
        })
    }
}

#[async_trait]
impl<T: OpenAICompatibleConfig> CompletionProvider for OpenAICompatibleProvider<T> {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, PersonaError> {
        if self.api_key.trim().is_empty() {
            let message = format!("Missing {} API key", T::PROVIDER_NAME);
            return Err(TransportError::Auth(message).into());
        }

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(OpenAICompatibleChatMessage {
            role: ChatRole::System.as_str(),
            content: system_prompt,
        });
        messages.extend(history.iter().map(api_message));

        let body = OpenAICompatibleChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        };

        let url = self
            .base_url
            .join(T::CHAT_ENDPOINT)
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("{} request payload: {}", T::PROVIDER_NAME, json);
            }
        }

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        log::debug!("{} HTTP status: {}", T::PROVIDER_NAME, response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(status_error(T::PROVIDER_NAME, status, error_text).into());
        }

        let resp_text = response.text().await?;
        let parsed: OpenAICompatibleChatResponse =
            serde_json::from_str(&resp_text).map_err(|e| TransportError::ResponseFormat {
                message: format!("Failed to decode {} API response: {e}", T::PROVIDER_NAME),
                raw_response: resp_text.clone(),
            })?;

        if let Some(usage) = &parsed.usage {
            log::debug!(
                "{} usage: prompt={} completion={} total={}",
                T::PROVIDER_NAME,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        match parsed.text() {
            Some(text) => Ok(text.to_string()),
            None => Err(TransportError::ResponseFormat {
                message: format!("{} API response contained no message content", T::PROVIDER_NAME),
                raw_response: resp_text,
            }
            .into()),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
