pub mod client;
pub mod questions;
pub mod response;
pub mod secrets;
pub mod simplify;

pub use client::{LlmConfig, initialize_client, test_configured_api_key};
pub use questions::request_comprehension_questions;
pub use secrets::{clear_api_key, prompt_for_api_key, store_api_key};
pub use simplify::request_article_simplification;
