//! Docpilot service entry point.
//!
//! Loads and validates configuration (aborting startup on any gap), wires the
//! adapters into the application handlers, and serves the REST API.

use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use docpilot::adapters::ai::{OpenAiConfig, OpenAiProvider};
use docpilot::adapters::http::{chat_router, ChatAppState};
use docpilot::adapters::retrieval::{EmbeddingConfig, PineconeConfig, PineconeGateway};
use docpilot::adapters::storage::FileConversationStore;
use docpilot::application::handlers::conversation::{
    CreateConversationHandler, DeleteConversationHandler, GetConversationHandler,
    ListConversationsHandler, SendMessageHandler,
};
use docpilot::config::AppConfig;
use docpilot::domain::retrieval::RelevanceEvaluator;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    init_tracing(&config);

    let evaluator = match build_evaluator(&config) {
        Ok(evaluator) => evaluator,
        Err(e) => {
            error!("Invalid relevance configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Validation guarantees the credentials below are present.
    let ai_api_key = config.ai.api_key.clone().unwrap_or_default();
    let completion = Arc::new(OpenAiProvider::new(
        OpenAiConfig::new(ai_api_key.clone())
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout()),
    ));

    let retrieval = Arc::new(PineconeGateway::new(
        PineconeConfig::new(
            config.retrieval.api_key.clone().unwrap_or_default(),
            config.retrieval.index_host.clone().unwrap_or_default(),
        )
        .with_timeout(config.retrieval.timeout()),
        EmbeddingConfig::new(ai_api_key)
            .with_model(&config.retrieval.embedding_model)
            .with_base_url(&config.ai.base_url),
    ));

    let store = Arc::new(FileConversationStore::new(&config.storage.data_dir));

    let state = ChatAppState {
        create: Arc::new(CreateConversationHandler::new(Arc::clone(&store))),
        get: Arc::new(GetConversationHandler::new(Arc::clone(&store))),
        list: Arc::new(ListConversationsHandler::new(Arc::clone(&store))),
        delete: Arc::new(DeleteConversationHandler::new(Arc::clone(&store))),
        send: Arc::new(SendMessageHandler::new(
            store,
            completion,
            retrieval,
            evaluator,
            config.retrieval.top_k,
        )),
    };

    let app = chat_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    info!(%addr, data_dir = %config.storage.data_dir, "starting docpilot");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_evaluator(
    config: &AppConfig,
) -> Result<RelevanceEvaluator, docpilot::domain::foundation::ValidationError> {
    match &config.relevance.off_topic_keywords {
        Some(keywords) => {
            RelevanceEvaluator::with_keywords(config.relevance.thresholds, keywords.clone())
        }
        None => RelevanceEvaluator::new(config.relevance.thresholds),
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
