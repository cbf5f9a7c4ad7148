use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GeminiConfig;
use crate::error::{Result, SermonError};

/// Shown when the service answers without any text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "AI로부터 응답을 받지 못했습니다.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    status: Option<String>,
}

/// Thin client for the Gemini `generateContent` REST endpoint.
///
/// One call is one HTTP request: there is no retry and no backoff.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SermonError::ApiAuth("API key is not configured".to_string()))?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SermonError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.trim_start_matches("models/").to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one prompt constrained to `schema` and return the raw JSON text.
    pub async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        tracing::info!(model = %self.model, prompt_len = prompt.len(), "Requesting content generation");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_error_response(status, &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SermonError::Generation(format!("Failed to read AI response: {e}")))?;

        let text = Self::response_text(&body);
        if text.trim().is_empty() {
            tracing::warn!(
                finish_reason = ?body.candidates.first().and_then(|c| c.finish_reason.as_deref()),
                prompt_feedback = ?body.prompt_feedback,
                "Generation returned no text"
            );
            return Err(SermonError::Generation(EMPTY_RESPONSE_MESSAGE.to_string()));
        }

        tracing::debug!(response_len = text.len(), "Generation response received");
        Ok(text)
    }

    fn response_text(body: &GenerateContentResponse) -> String {
        body.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn map_error_response(status: StatusCode, body: &str) -> SermonError {
        let (message, api_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => (envelope.error.message, envelope.error.status),
            Err(_) => (body.trim().to_string(), None),
        };

        tracing::error!(%status, api_status = ?api_status, message = %message, "Generation request failed");

        let mentions_key = message.to_lowercase().contains("api key");
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                if mentions_key =>
            {
                SermonError::ApiAuth(message)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                SermonError::ApiAuth(format!("{status}: {message}"))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                SermonError::Generation(format!("AI service rate limit exceeded: {message}"))
            }
            _ => SermonError::Generation(format!("AI request failed: {status} - {message}")),
        }
    }
}
