//! PersonaAI is a small web UI for chatting with a hosted LLM under selectable persona modes.
//!
//! # Overview
//! Each browser session keeps one conversation per [`mode::Mode`]. The crate provides:
//!
//! - A completion client for OpenAI-compatible APIs (Groq by default)
//! - In-memory, per-session conversation state
//! - One-shot content idea and summary flows
//! - Export of a conversation to plain text or a paginated PDF
//! - An axum server rendering the single page
//!
//! # Architecture
//! The modules are layered leaves first: `chat` and `mode` hold the data model,
//! `completion`/`providers`/`backends` talk to the remote API, `session` keeps
//! state, `export` renders documents and `api` wires it all to HTTP.

// Re-export for convenience
pub use async_trait::async_trait;

/// Web server, request handlers and page rendering
pub mod api;

/// Backend configurations for supported providers
pub mod backends;

/// Message model shared by sessions, exports and the completion client
pub mod chat;

/// The completion trait and the one-shot ideas/summary flows
pub mod completion;

/// Startup configuration
pub mod config;

/// Error types and handling
pub mod error;

/// Conversation export to text and PDF
pub mod export;

/// Persona modes and their system prompts
pub mod mode;

/// Shared OpenAI-compatible client implementation
pub mod providers;

/// Per-session conversation state
pub mod session;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
