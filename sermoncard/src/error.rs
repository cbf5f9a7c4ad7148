use thiserror::Error;

/// Shown instead of the raw error when the service complains about its key.
pub const API_KEY_MESSAGE: &str = "API Key가 설정되지 않았습니다. 관리자 설정을 확인해주세요.";

/// Fallback when an error carries no message at all.
pub const GENERIC_FAILURE_MESSAGE: &str = "처리 중 오류가 발생했습니다.";

#[derive(Error, Debug)]
pub enum SermonError {
    #[error("{0}")]
    Extraction(String),

    #[error("{0}")]
    Generation(String),

    #[error("{0}")]
    Validation(String),

    #[error("API key error: {0}")]
    ApiAuth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Collapse any failure into the single line the user sees.
///
/// Extraction and generation failures are not distinguished, except that a
/// message mentioning the API key is replaced with an administrator-facing one.
pub fn user_message(error: &SermonError) -> String {
    let message = match error {
        SermonError::ApiAuth(_) => return API_KEY_MESSAGE.to_string(),
        other => other.to_string(),
    };

    if message.to_lowercase().contains("api key") {
        API_KEY_MESSAGE.to_string()
    } else if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

pub type Result<T> = std::result::Result<T, SermonError>;
