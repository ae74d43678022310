use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use leadscout_engine::SearchOptions;

use crate::auth::ApiKey;
use crate::AppState;

#[derive(Deserialize)]
pub struct SignalsQuery {
    query: Option<String>,
    language: Option<String>,
    country: Option<String>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "config": state.rules.name,
        "signals": state.rules.signals.len(),
    }))
}

pub async fn api_signals(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Query(params): Query<SignalsQuery>,
) -> impl IntoResponse {
    // Rejected before anything leaves the process.
    let query = match params.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "query parameter required"})),
            )
                .into_response();
        }
    };

    let language = params
        .language
        .clone()
        .unwrap_or_else(|| "en".to_string());
    let options = SearchOptions {
        language: language.clone(),
        country: params.country.clone(),
        ..SearchOptions::default()
    };

    match state.pipeline.run(&query, &options).await {
        Ok(outcome) if outcome.articles.is_empty() => Json(json!({
            "query": query,
            "articles_found": 0,
            "signals": outcome.signals,
            "score": outcome.score,
            "tier": outcome.tier,
        }))
        .into_response(),

        Ok(outcome) => {
            let articles: Vec<serde_json::Value> = outcome
                .articles
                .iter()
                .take(5)
                .map(|a| {
                    json!({
                        "title": a.title,
                        "source": a.source,
                        "url": a.url,
                    })
                })
                .collect();

            Json(json!({
                "query": query,
                "language": language,
                "country": params.country,
                "articles_found": outcome.articles.len(),
                "detection_method": outcome.detection_method,
                "signals": outcome.signals,
                "score": outcome.score,
                "tier": outcome.tier,
                "articles": articles,
            }))
            .into_response()
        }

        Err(e) => {
            error!(error = %e, query, "Signal detection failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "Signal detection failed",
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
