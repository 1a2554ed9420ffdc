use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tolk_api::{
    build_router,
    config::{Config, StorageBackend},
    state::AppState,
};
use tolk_corpus::Corpus;
use tolk_persist::{MemoryVoteStore, VoteStore, VoteStoreBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Tolk API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Load translated threads
    let corpus = match Corpus::load(&config.corpus.path) {
        Ok(corpus) => corpus,
        Err(e) => {
            tracing::warn!("Corpus unavailable, serving an empty thread list: {}", e);
            Corpus::empty()
        }
    };

    // Initialize vote storage
    let store: Arc<dyn VoteStore> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory vote store; votes are lost on restart");
            Arc::new(MemoryVoteStore::new())
        }
        StorageBackend::Mongodb => {
            tracing::info!("Connecting to MongoDB");
            VoteStoreBuilder::new()
                .mongodb_uri(config.mongodb_uri.clone())
                .database(config.mongodb.database.clone())
                .collection(config.mongodb.collection.clone())
                .pool_size(config.mongodb.pool_size)
                .timeout(config.mongodb.timeout())
                .build()
                .await?
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), corpus, store));

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
