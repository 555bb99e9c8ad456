mod config;
mod errors;
mod interview;
mod llm_client;
mod resume;
mod routes;
mod speech;
mod state;
mod vector_store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::controller::InterviewController;
use crate::interview::session::SessionStore;
use crate::llm_client::GroqChatClient;
use crate::routes::build_router;
use crate::speech::{GroqSpeechClient, GroqTranscriber};
use crate::state::AppState;
use crate::vector_store::PineconeClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruiter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize hosted collaborators
    let llm = GroqChatClient::new(config.groq_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let transcriber = GroqTranscriber::new(config.groq_api_key.clone())?;
    info!(
        "Transcription client initialized (model: {})",
        speech::transcribe::MODEL
    );

    let speech_client = GroqSpeechClient::new(config.groq_api_key.clone())?;
    info!(
        "Speech synthesis client initialized (model: {})",
        speech::synthesize::MODEL
    );

    let vector_store =
        PineconeClient::connect(config.pinecone_api_key.clone(), &config.pinecone_index).await?;
    info!("Vector store connected (index: {})", config.pinecone_index);

    // Build the dialogue controller and app state
    let controller = InterviewController::new(
        Arc::new(llm),
        Arc::new(transcriber),
        Arc::new(speech_client),
    );

    let state = AppState {
        sessions: SessionStore::new(),
        controller: Arc::new(controller),
        vector_store: Arc::new(vector_store),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
