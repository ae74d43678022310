use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gnews_client::GnewsClient;
use leadscout_common::{Config, RuleSet};
use leadscout_engine::{
    KeywordDetector, LlmDetector, RetryingFetcher, RetryPolicy, SignalDetector, SignalPipeline,
};
use llm_client::OpenRouterClient;

mod auth;
mod rest;

pub struct AppState {
    pub pipeline: SignalPipeline,
    pub rules: Arc<RuleSet>,
    pub api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("leadscout_api=info".parse()?)
                .add_directive("leadscout_engine=info".parse()?),
        )
        .init();

    let config = Config::from_env();

    let rules = match RuleSet::load(&config.signals_config) {
        Ok(rules) => Arc::new(rules),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load signals config");
            std::process::exit(1);
        }
    };
    info!(
        config = %rules.name,
        signals = rules.signals.len(),
        "Signals config loaded"
    );

    let fetcher = RetryingFetcher::new(
        Arc::new(GnewsClient::new(&config.gnews_api_key)),
        RetryPolicy::default().with_max_attempts(config.max_retries),
    );

    let llm_client = config.openrouter_api_key.as_deref().map(|key| {
        let mut client = OpenRouterClient::new(key).with_app_name(&rules.name);
        if let Some(ref url) = config.app_url {
            client = client.with_site_url(url);
        }
        client
    });

    // LLM first, keywords as the non-abstaining fallback.
    let detectors: Vec<Arc<dyn SignalDetector>> = vec![
        Arc::new(LlmDetector::new(
            llm_client,
            &config.openrouter_model,
            rules.clone(),
        )),
        Arc::new(KeywordDetector::new(rules.clone())),
    ];

    let pipeline = SignalPipeline::new(fetcher, detectors, rules.clone());

    let state = Arc::new(AppState {
        pipeline,
        rules,
        api_key: config.api_key.clone(),
    });

    let app = Router::new()
        // Liveness
        .route("/", get(|| async { "ok" }))
        .route("/health", get(rest::health))
        // Signal detection (also mounted under /api for keyed clients)
        .route("/signals", get(rest::api_signals))
        .route("/api/signals", get(rest::api_signals))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only (no query params)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("LeadScout API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
