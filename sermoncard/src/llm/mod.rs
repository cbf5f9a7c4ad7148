mod api;
pub mod prompts;
mod provider;
pub mod schema;

pub use api::{GeminiClient, EMPTY_RESPONSE_MESSAGE};
pub use provider::{parse_sermon_output, ContentGenerator, GeminiGenerator};
