mod analytics;
mod config;
mod embedding;
mod errors;
mod evaluation;
mod extraction;
mod feedback;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::EmbeddingService;
use crate::evaluation::session::Session;
use crate::extraction::DocumentExtractor;
use crate::feedback::LlmFeedbackGenerator;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scoring::{Evaluator, SemanticScorer, SkillVocabulary};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Relevance API v{}", env!("CARGO_PKG_VERSION"));

    // Skill vocabulary: file override or built-in list
    let vocabulary = match &config.skill_vocabulary_path {
        Some(path) => SkillVocabulary::load(path)?,
        None => SkillVocabulary::default(),
    };
    info!("Skill vocabulary loaded ({} skills)", vocabulary.len());

    // Embedding model loads lazily; warm it up off the async runtime
    let embeddings = Arc::new(EmbeddingService::new(config.embedding_model));
    info!("Embedding model: {}", config.embedding_model.name());
    let warmup = Arc::clone(&embeddings);
    tokio::task::spawn_blocking(move || {
        if let Err(e) = warmup.ensure_loaded() {
            warn!("Embedding warm-up failed, will retry on first evaluation: {e}");
        }
    });

    // Initialize LLM client (optional)
    let llm = match &config.anthropic_api_key {
        Some(key) => Some(LlmClient::new(key.clone())?),
        None => None,
    };
    let feedback = LlmFeedbackGenerator::new(llm);
    if feedback.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        info!("ANTHROPIC_API_KEY not set; feedback uses fallback suggestions");
    }

    info!(
        "Format support: pdf={} docx={}",
        config.formats.pdf, config.formats.docx
    );

    // Build app state
    let state = AppState {
        evaluator: Evaluator::new(Arc::new(vocabulary), SemanticScorer::new(embeddings)),
        extractor: DocumentExtractor::new(config.formats),
        feedback: Arc::new(feedback),
        session: Arc::new(RwLock::new(Session::default())),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
