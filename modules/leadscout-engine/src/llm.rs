use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use llm_client::{strip_code_blocks, ChatMessage, ChatRequest, OpenRouterClient};
use leadscout_common::{Article, DetectionMethod, RuleSet, SignalMap, SignalType};

use crate::detector::SignalDetector;

/// Articles beyond this many are left out of the prompt.
const PROMPT_ARTICLE_CAP: usize = 10;

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 500;

/// Semantic strategy: asks an LLM which signals the articles evidence.
/// Abstains (never errors) on any failure — missing credential, transport
/// or HTTP failure, empty content, unparseable JSON — so the resolver can
/// fall back to keyword matching.
pub struct LlmDetector {
    client: Option<OpenRouterClient>,
    model: String,
    rules: Arc<RuleSet>,
}

impl LlmDetector {
    /// `client` is `None` when no API key is configured; the detector then
    /// abstains on every call.
    pub fn new(client: Option<OpenRouterClient>, model: &str, rules: Arc<RuleSet>) -> Self {
        Self {
            client,
            model: model.to_string(),
            rules,
        }
    }
}

#[async_trait]
impl SignalDetector for LlmDetector {
    async fn detect(&self, articles: &[Article], query: &str) -> Option<SignalMap> {
        let Some(client) = &self.client else {
            warn!("OPENROUTER_API_KEY not set, using keyword matching only");
            return None;
        };

        if articles.is_empty() {
            return Some(self.rules.empty_signals());
        }

        let prompt = build_prompt(&self.rules, articles, query);
        info!(
            model = %self.model,
            article_count = articles.len(),
            "Classifying signals with LLM"
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_TOKENS),
        };

        let content = match client.chat(&request).await {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "LLM classification failed, falling back to keywords");
                return None;
            }
        };

        let parsed: Value = match serde_json::from_str(strip_code_blocks(&content)) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "LLM returned unparseable JSON, falling back to keywords");
                return None;
            }
        };

        Some(normalize(&parsed, &self.rules))
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Llm
    }
}

/// Fold an arbitrary JSON response onto the canonical signal names: a value
/// is taken only if it is boolean-typed, anything else defaults to false,
/// and keys that are not configured signals are dropped.
fn normalize(parsed: &Value, rules: &RuleSet) -> SignalMap {
    let mut signals = rules.empty_signals();
    if let Some(obj) = parsed.as_object() {
        for (name, detected) in signals.iter_mut() {
            if let Some(Value::Bool(b)) = obj.get(name) {
                *detected = *b;
            }
        }
    }
    signals
}

fn build_prompt(rules: &RuleSet, articles: &[Article], query: &str) -> String {
    format!(
        "You are a sales intelligence analyst. Analyze these news articles about \"{query}\" \
and detect which signals are present.\n\n{definitions}\nARTICLES:\n{digest}\n\n\
RULES:\n\
1. Only mark TRUE if there's clear evidence in the articles\n\
2. News must be ABOUT \"{query}\" specifically\n\
3. Be conservative - when uncertain, mark FALSE\n\n\
Respond with ONLY valid JSON:\n{template}",
        definitions = build_signal_definitions(rules),
        digest = article_digest(articles),
        template = answer_template(rules),
    )
}

/// Signal definitions grouped by type, with human descriptions.
fn build_signal_definitions(rules: &RuleSet) -> String {
    let sections = [
        (SignalType::Trigger, "TRIGGERS (High Intent)"),
        (SignalType::Context, "CONTEXT (Opportunity)"),
        (SignalType::Negative, "NEGATIVE (Risk)"),
    ];

    let mut lines = Vec::new();
    for (signal_type, label) in sections {
        lines.push(format!("{label}:"));
        for (name, def) in rules.signals_by_type(signal_type) {
            lines.push(format!("- {name}: {}", def.description));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Up to the first ten articles: numbered title plus the first line of the
/// description.
fn article_digest(articles: &[Article]) -> String {
    articles
        .iter()
        .take(PROMPT_ARTICLE_CAP)
        .enumerate()
        .map(|(i, a)| {
            let first_line = a.description.lines().next().unwrap_or("");
            format!("[{}] {}\n{first_line}", i + 1, a.title)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// All-false JSON object over the canonical names, shown to the model as
/// the required answer shape.
fn answer_template(rules: &RuleSet) -> String {
    serde_json::to_string_pretty(&rules.empty_signals()).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RULES: &str = r#"
name = "test-rules"

[signals.hiring_surge]
type = "trigger"
keywords = ["hiring"]
description = "Company is expanding headcount"

[signals.budget_cut]
type = "negative"
keywords = ["budget cut"]
description = "Spending is being reduced"

[signals.expansion]
type = "context"
keywords = ["expansion"]
description = "Company is growing"
"#;

    fn rules() -> Arc<RuleSet> {
        Arc::new(RuleSet::from_toml(RULES).unwrap())
    }

    fn article(title: &str, description: &str) -> Article {
        Article {
            title: title.to_string(),
            description: description.to_string(),
            url: String::new(),
            published_at: String::new(),
            source: String::new(),
        }
    }

    fn chat_body(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    async fn detector_against(server: &MockServer) -> LlmDetector {
        let client = OpenRouterClient::new("test-key").with_base_url(&server.uri());
        LlmDetector::new(Some(client), "test-model", rules())
    }

    // --- normalize ---

    #[test]
    fn normalize_drops_unknown_keys() {
        let parsed = json!({"hiring_surge": true, "made_up_signal": true});
        let signals = normalize(&parsed, &rules());
        assert_eq!(signals.len(), 3);
        assert!(!signals.contains_key("made_up_signal"));
        assert_eq!(signals["hiring_surge"], true);
    }

    #[test]
    fn normalize_defaults_missing_keys_to_false() {
        let parsed = json!({"hiring_surge": true});
        let signals = normalize(&parsed, &rules());
        assert_eq!(signals["budget_cut"], false);
        assert_eq!(signals["expansion"], false);
    }

    #[test]
    fn normalize_rejects_non_boolean_values() {
        let parsed = json!({
            "hiring_surge": "yes",
            "budget_cut": 1,
            "expansion": null
        });
        let signals = normalize(&parsed, &rules());
        assert!(signals.values().all(|v| !v));
    }

    #[test]
    fn normalize_handles_non_object_payload() {
        let signals = normalize(&json!([true, false]), &rules());
        assert_eq!(signals.len(), 3);
        assert!(signals.values().all(|v| !v));
    }

    // --- prompt ---

    #[test]
    fn prompt_groups_definitions_and_caps_articles() {
        let articles: Vec<Article> = (0..15)
            .map(|i| article(&format!("Title {i}"), "line one\nline two"))
            .collect();
        let prompt = build_prompt(&rules(), &articles, "Acme");

        assert!(prompt.contains("TRIGGERS (High Intent):"));
        assert!(prompt.contains("CONTEXT (Opportunity):"));
        assert!(prompt.contains("NEGATIVE (Risk):"));
        assert!(prompt.contains("- hiring_surge: Company is expanding headcount"));
        assert!(prompt.contains("about \"Acme\""));
        assert!(prompt.contains("[10] Title 9"));
        assert!(!prompt.contains("[11]"));
        // Only the first description line makes it in.
        assert!(prompt.contains("line one"));
        assert!(!prompt.contains("line two"));
    }

    #[test]
    fn answer_template_lists_every_signal_as_false() {
        let template = answer_template(&rules());
        let parsed: Value = serde_json::from_str(&template).unwrap();
        let obj = parsed.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj.values().all(|v| v == &json!(false)));
    }

    // --- detect ---

    #[tokio::test]
    async fn detects_from_fenced_json_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(
                "```json\n{\"hiring_surge\": true, \"budget_cut\": false}\n```",
            )))
            .mount(&server)
            .await;

        let detector = detector_against(&server).await;
        let signals = detector
            .detect(&[article("Acme hiring", "")], "Acme")
            .await
            .expect("should not abstain");

        assert_eq!(signals["hiring_surge"], true);
        assert_eq!(signals["budget_cut"], false);
        assert_eq!(signals["expansion"], false);
    }

    #[tokio::test]
    async fn abstains_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let detector = detector_against(&server).await;
        assert!(detector
            .detect(&[article("Acme hiring", "")], "Acme")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn abstains_on_unparseable_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_body("I think the signals are probably true")),
            )
            .mount(&server)
            .await;

        let detector = detector_against(&server).await;
        assert!(detector
            .detect(&[article("Acme hiring", "")], "Acme")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn abstains_without_credential() {
        let detector = LlmDetector::new(None, "test-model", rules());
        assert!(detector
            .detect(&[article("Acme hiring", "")], "Acme")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn empty_article_list_yields_all_false_without_calling_out() {
        // No mock server mounted: a network call would error out and abstain.
        let client = OpenRouterClient::new("test-key").with_base_url("http://127.0.0.1:9");
        let detector = LlmDetector::new(Some(client), "test-model", rules());

        let signals = detector.detect(&[], "Acme").await.expect("no abstain");
        assert!(signals.values().all(|v| !v));
        assert_eq!(signals.len(), 3);
    }
}
