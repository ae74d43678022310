pub mod detector;
pub mod fetcher;
pub mod keywords;
pub mod llm;
pub mod pipeline;
pub mod retry;
pub mod scoring;

pub use detector::{resolve, SignalDetector};
pub use fetcher::{NewsSource, RetryingFetcher, SearchOptions};
pub use keywords::KeywordDetector;
pub use llm::LlmDetector;
pub use pipeline::{QueryOutcome, SignalPipeline};
pub use retry::{DelaySource, RetryPolicy, TokioDelay};
pub use scoring::{score_signals, tier_for};
