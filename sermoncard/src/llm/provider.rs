use async_trait::async_trait;

use crate::config::GeminiConfig;
use crate::error::{Result, SermonError};
use crate::llm::api::{GeminiClient, EMPTY_RESPONSE_MESSAGE};
use crate::llm::prompts::sermon_analysis_prompt;
use crate::llm::schema::sermon_output_schema;
use crate::models::SermonOutput;

/// Anything that can turn sermon text into a [`SermonOutput`].
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, text: &str) -> Result<SermonOutput>;
}

/// Parse the service's JSON body. No repair is attempted.
pub fn parse_sermon_output(raw: &str) -> Result<SermonOutput> {
    if raw.trim().is_empty() {
        return Err(SermonError::Generation(EMPTY_RESPONSE_MESSAGE.to_string()));
    }

    serde_json::from_str(raw).map_err(|e| {
        tracing::error!(
            response_len = raw.len(),
            response_preview = %raw.chars().take(100).collect::<String>(),
            error = %e,
            "Failed to parse sermon output"
        );
        SermonError::Generation(format!("Failed to parse AI response: {e}"))
    })
}

#[derive(Clone, Debug)]
enum GeneratorBackend {
    Gemini(GeminiClient),
    Unavailable { reason: String },
}

/// Production generator. Without a usable client every call fails with the
/// reason, so a missing key surfaces when the user first uploads.
#[derive(Clone, Debug)]
pub struct GeminiGenerator {
    backend: GeneratorBackend,
}

impl GeminiGenerator {
    pub fn new(config: &GeminiConfig) -> Self {
        match GeminiClient::new(config) {
            Ok(client) => Self::from_client(client),
            Err(e) => Self::unavailable(&e.to_string()),
        }
    }

    pub fn from_client(client: GeminiClient) -> Self {
        Self {
            backend: GeneratorBackend::Gemini(client),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: GeneratorBackend::Unavailable {
                reason: reason.to_string(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.backend, GeneratorBackend::Gemini(_))
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate(&self, text: &str) -> Result<SermonOutput> {
        let client = match &self.backend {
            GeneratorBackend::Gemini(client) => client,
            GeneratorBackend::Unavailable { reason } => {
                return Err(SermonError::ApiAuth(reason.clone()));
            }
        };

        if text.trim().is_empty() {
            return Err(SermonError::Extraction(
                "Sermon text cannot be empty".to_string(),
            ));
        }

        let prompt = sermon_analysis_prompt(text);
        let raw = client
            .generate_json(&prompt, &sermon_output_schema())
            .await?;
        parse_sermon_output(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_generator_reports_reason() {
        let generator = GeminiGenerator::new(&GeminiConfig::default());
        assert!(!generator.is_available());

        let err = generator.generate("본문").await.unwrap_err();
        assert!(matches!(err, SermonError::ApiAuth(_)));
        assert_eq!(
            crate::error::user_message(&err),
            crate::error::API_KEY_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_before_any_request() {
        let config = GeminiConfig {
            api_key: Some("k".to_string()),
            // Nothing listens here; reaching the network would fail differently
            base_url: "http://127.0.0.1:9".to_string(),
            ..GeminiConfig::default()
        };
        let generator = GeminiGenerator::new(&config);
        assert!(generator.is_available());

        let err = generator.generate(" \n\t").await.unwrap_err();
        assert!(matches!(err, SermonError::Extraction(_)));
    }

    #[test]
    fn test_parse_complete_output() {
        let raw = r#"{
            "summaryCard": {"date": "", "subject": "s", "coreMessage": [], "scripture": "", "actionPoints": [], "hashtags": []},
            "infographic": {"title": "t", "subtitle": "", "scripture": ""}
        }"#;
        let output = parse_sermon_output(raw).unwrap();
        assert_eq!(output.summary_card.subject, "s");
        assert_eq!(output.infographic.title, "t");
    }

    #[test]
    fn test_parse_partial_output_fails() {
        let raw = r#"{"summaryCard": {"date": "", "subject": "s", "coreMessage": [], "scripture": "", "actionPoints": [], "hashtags": []}}"#;
        assert!(matches!(
            parse_sermon_output(raw),
            Err(SermonError::Generation(_))
        ));
    }

    #[test]
    fn test_parse_malformed_json_fails() {
        assert!(matches!(
            parse_sermon_output("{not json"),
            Err(SermonError::Generation(_))
        ));
    }

    #[test]
    fn test_parse_empty_body_is_empty_response() {
        match parse_sermon_output("  ") {
            Err(SermonError::Generation(msg)) => assert_eq!(msg, EMPTY_RESPONSE_MESSAGE),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
