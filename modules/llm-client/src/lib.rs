pub mod client;
pub mod types;
pub mod util;

pub use client::OpenRouterClient;
pub use types::{ChatMessage, ChatRequest, ChatResponse};
pub use util::strip_code_blocks;
