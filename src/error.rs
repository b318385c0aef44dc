use thiserror::Error;

/// Failures talking to the remote chat-completion API.
///
/// Every variant is surfaced to the user; nothing here is retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout or body transfer failures
    #[error("HTTP Error: {0}")]
    Http(String),
    /// Missing, rejected or expired credentials
    #[error("Auth Error: {0}")]
    Auth(String),
    /// The provider asked us to slow down
    #[error("Rate limited: {0}")]
    RateLimited(String),
    /// Any other non-success status returned by the provider
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The provider answered 2xx but the body was not a usable completion
    #[error("Response Format Error: {message}. Raw response: {raw_response}")]
    ResponseFormat {
        message: String,
        raw_response: String,
    },
}

/// Error types that can occur while serving a PersonaAI session.
#[derive(Debug, Error)]
pub enum PersonaError {
    /// Missing credential or malformed startup setting; fatal at boot
    #[error("Configuration Error: {0}")]
    Configuration(String),
    /// Blank topic, blank message or nothing to export
    #[error("{0}")]
    EmptyInput(String),
    /// Unknown mode identifier
    #[error("Invalid mode: {0}")]
    InvalidMode(String),
    /// Completion call failed
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Page template failed to render
    #[error("Render Error: {0}")]
    Render(String),
    /// Document generation failed
    #[error("Export Error: {0}")]
    Export(String),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts reqwest HTTP errors into transport failures
impl From<reqwest::Error> for PersonaError {
    fn from(err: reqwest::Error) -> Self {
        PersonaError::Transport(TransportError::Http(err.to_string()))
    }
}

impl From<minijinja::Error> for PersonaError {
    fn from(err: minijinja::Error) -> Self {
        PersonaError::Render(err.to_string())
    }
}

impl PersonaError {
    /// Whether this error should be shown as a warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, PersonaError::EmptyInput(_))
    }
}
