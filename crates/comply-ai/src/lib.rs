//! # comply-ai
//!
//! Thin clients for the outbound AI providers: page scraping, text
//! reasoning, label image vision, and regulatory web search. Every client
//! speaks JSON over HTTPS via `reqwest` and reports failures through the
//! shared [`ProviderError`] taxonomy.

pub mod error;
pub mod json;
pub mod reasoning;
pub mod retry;
pub mod scrape;
pub mod search;
pub mod vision;

pub use error::ProviderError;
pub use json::{extract_json_array, extract_json_object};
pub use reasoning::ReasoningClient;
pub use retry::RetryPolicy;
pub use scrape::{ScrapeClient, ScrapedPage};
pub use search::{SearchClient, SearchHit};
pub use vision::VisionClient;
