use std::sync::Arc;

use clap::Parser;
use persona_ai::api::Server;
use persona_ai::config::Config;
use persona_ai::error::PersonaError;

/// Loads configuration, builds the Groq client and serves the web UI.
///
/// A missing credential stops the process before anything is served.
async fn run(config: Config) -> Result<(), PersonaError> {
    let provider = config.build_provider()?;
    log::info!("using model {}", provider.model);

    let server = Server::new(Arc::new(provider))?
        .with_session_idle_timeout(config.session_idle_timeout());
    server.run(&config.bind).await
}

#[tokio::main]
async fn main() {
    // A .env in the working directory may supply GROQ_API_KEY
    let _ = dotenvy::dotenv();
    persona_ai::init_logging();

    let config = Config::parse();

    if let Err(e) = run(config).await {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
