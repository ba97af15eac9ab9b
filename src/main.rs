//! Haven CLI entrypoint.
//!
//! `haven [request.json]` reads a recommendation request (stdin when no file is given) and
//! prints the ranked response as JSON. `haven --health-check` prints the dependency health and
//! exits non-zero when both dependencies are unavailable.

use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::io::AsyncReadExt;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use haven::cache::{CacheConfig, EmbeddingCache, MokaCacheStore};
use haven::config::Config;
use haven::constants::{
    DEFAULT_PROVIDER_REQUEST_TIMEOUT, MIN_PROVIDER_REQUEST_TIMEOUT, VECTOR_SEARCH_RESERVE,
};
use haven::directory::JsonDirectory;
use haven::embedding::{
    EmbeddingClient, EmbeddingClientConfig, EmbeddingProvider, HttpEmbeddingProvider,
    HttpProviderConfig, RetryPolicy, StubEmbeddingProvider,
};
use haven::error::ErrorResponse;
use haven::model::{RecommendationRequest, RecommendationResponse};
use haven::recommend::{HealthState, Recommender, RecommenderConfig};
use haven::scoring::SemanticScorer;
use haven::vectordb::QdrantVectorStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

enum Mode {
    HealthCheck,
    Recommend { input: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mode = if std::env::args().any(|arg| arg == "--health-check") {
        Mode::HealthCheck
    } else {
        Mode::Recommend {
            input: std::env::args().nth(1),
        }
    };

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        centers = %config.centers_path.display(),
        qdrant_url = %config.qdrant_url,
        collection = %config.collection,
        model = %config.embedding_model,
        stub_provider = config.mock_provider,
        "Haven starting"
    );

    let code = if config.mock_provider {
        tracing::warn!("HAVEN_MOCK_PROVIDER set, using the deterministic stub embedder");
        let provider = StubEmbeddingProvider::new(config.embedding_dim);
        run(&config, provider, mode).await?
    } else {
        // Every provider attempt and backoff must finish inside the semantic budget.
        let request_timeout = RetryPolicy::default()
            .attempt_timeout(config.semantic_timeout.saturating_sub(VECTOR_SEARCH_RESERVE))
            .clamp(MIN_PROVIDER_REQUEST_TIMEOUT, DEFAULT_PROVIDER_REQUEST_TIMEOUT);
        let mut provider_config =
            HttpProviderConfig::new(&config.embedding_url, &config.embedding_model)
                .with_dimension(config.embedding_dim)
                .with_request_timeout(request_timeout);
        if let Some(key) = &config.embedding_api_key {
            provider_config = provider_config.with_api_key(key);
        }
        let provider = HttpEmbeddingProvider::new(provider_config)?;
        run(&config, provider, mode).await?
    };

    std::process::exit(code);
}

async fn run<P: EmbeddingProvider>(config: &Config, provider: P, mode: Mode) -> anyhow::Result<i32> {
    let directory = JsonDirectory::from_path(&config.centers_path).await?;
    tracing::info!(centers = directory.len(), "directory loaded");

    let cache_config = CacheConfig::default()
        .with_ttl(config.cache_ttl)
        .with_capacity(config.cache_capacity);
    let store = Arc::new(MokaCacheStore::with_capacity(cache_config.capacity));
    let cache = EmbeddingCache::new(store, cache_config);

    let client = EmbeddingClient::new(provider, cache, EmbeddingClientConfig::default());
    let vectors =
        QdrantVectorStore::new(&config.qdrant_url, &config.collection, config.embedding_dim)?;

    let recommender = Recommender::new(
        directory,
        SemanticScorer::new(client, vectors),
        RecommenderConfig::default().with_semantic_timeout(config.semantic_timeout),
    );

    match mode {
        Mode::HealthCheck => {
            let health = recommender.check_health().await;
            println!("{}", serde_json::to_string_pretty(&health)?);
            Ok(if health.status == HealthState::Unavailable {
                1
            } else {
                0
            })
        }
        Mode::Recommend { input } => {
            let raw = read_input(input.as_deref()).await?;
            let request: RecommendationRequest =
                serde_json::from_str(&raw).context("request is not valid JSON")?;

            let cancel = CancellationToken::new();
            let watcher = cancel.clone();
            tokio::spawn(async move {
                if signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received Ctrl+C, cancelling request");
                    watcher.cancel();
                }
            });

            match recommender.recommend(request, &cancel).await {
                Ok(result) => {
                    let response = RecommendationResponse::from(&result);
                    println!("{}", serde_json::to_string_pretty(&response)?);
                    Ok(0)
                }
                Err(e) => {
                    tracing::error!(error = %e, "recommendation failed");
                    let body = ErrorResponse::from(&e);
                    println!("{}", serde_json::to_string_pretty(&body)?);
                    Ok(if e.is_client_error() { 2 } else { 1 })
                }
            }
        }
    }
}

async fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {path}")),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}
