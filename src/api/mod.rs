//! Web UI server
//!
//! Serves the single PersonaAI page and the actions behind its controls.
//! Each POST mutates the caller's session and redirects back to the page, so
//! every state change is followed by an explicit render.

mod handlers;
mod types;
pub mod view;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{completion::CompletionProvider, error::PersonaError, session::SessionRegistry};
use view::View;

pub use handlers::SESSION_COOKIE;
pub use types::{ChatForm, IdeasForm, ModeForm, ModeQuery};

/// Largest form body accepted from the browser.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Main server struct that owns the completion client, sessions and view
pub struct Server {
    provider: Arc<dyn CompletionProvider>,
    sessions: Arc<SessionRegistry>,
    view: Arc<View>,
}

/// Internal server state shared between request handlers
#[derive(Clone)]
struct ServerState {
    provider: Arc<dyn CompletionProvider>,
    sessions: Arc<SessionRegistry>,
    view: Arc<View>,
}

impl Server {
    /// Creates a new server around a completion client
    ///
    /// # Arguments
    /// * `provider` - Client used for chat turns, ideas and summaries
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Result<Self, PersonaError> {
        Ok(Self {
            provider,
            sessions: Arc::new(SessionRegistry::new()),
            view: Arc::new(View::new()?),
        })
    }

    /// Replaces the session table with one that evicts sessions idle for `idle_timeout`
    pub fn with_session_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.sessions = Arc::new(SessionRegistry::with_idle_timeout(idle_timeout));
        self
    }

    /// Shared session table, exposed for inspection
    pub fn sessions(&self) -> Arc<SessionRegistry> {
        self.sessions.clone()
    }

    /// Builds the router without binding a socket
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/chat", post(handlers::handle_chat))
            .route("/ideas", post(handlers::handle_ideas))
            .route("/summary", post(handlers::handle_summary))
            .route("/clear", post(handlers::handle_clear))
            .route("/export/txt", get(handlers::export_txt))
            .route(
                "/export/pdf",
                post(handlers::prepare_pdf).get(handlers::download_pdf),
            )
            .route("/session/end", post(handlers::end_session))
            .route("/health", get(handlers::health))
            .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
            .with_state(ServerState {
                provider: self.provider.clone(),
                sessions: self.sessions.clone(),
                view: self.view.clone(),
            })
    }

    /// Starts the server and listens for requests on the specified address
    ///
    /// # Arguments
    /// * `addr` - Address to bind to (e.g. "127.0.0.1:8501")
    pub async fn run(self, addr: &str) -> Result<(), PersonaError> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            PersonaError::Configuration(format!("cannot listen on {addr}: {e}"))
        })?;
        log::info!("PersonaAI listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app).await?;
        Ok(())
    }
}
