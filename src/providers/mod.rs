/// Generic client for chat-completion APIs that speak the OpenAI wire format
pub mod openai_compatible;
