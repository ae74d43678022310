use std::env;
use std::path::PathBuf;

/// Model used for signal classification when OPENROUTER_MODEL is not set.
pub const DEFAULT_OPENROUTER_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";

/// Application configuration loaded from environment variables.
/// Secrets stay in the environment; rule definitions live in the TOML file
/// pointed at by `signals_config`.
#[derive(Debug, Clone)]
pub struct Config {
    // News retrieval
    pub gnews_api_key: String,
    pub max_retries: u32,

    // LLM classification (optional; keyword matching covers its absence)
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
    pub api_key: Option<String>,
    pub app_url: Option<String>,

    // Rules
    pub signals_config: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            gnews_api_key: required_env("GNEWS_API_KEY"),
            max_retries: env::var("SCRAPE_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("SCRAPE_MAX_RETRIES must be a number"),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok(),
            openrouter_model: env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.to_string()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            api_key: env::var("API_KEY").ok(),
            app_url: env::var("APP_URL").ok(),
            signals_config: env::var("SIGNALS_CONFIG")
                .unwrap_or_else(|_| "./signals.toml".to_string())
                .into(),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
