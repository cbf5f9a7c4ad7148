//! Landing → uploading → results flow.
//!
//! [`AppState`] holds the pure transitions; [`SermonApp`] sequences the two
//! suspending calls (extraction, then generation) around them. `upload` takes
//! `&mut self`, so a second analysis cannot start while one is in flight.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{user_message, Result, SermonError};
use crate::export;
use crate::llm::ContentGenerator;
use crate::models::{SermonOutput, UploadedFile};
use crate::processing::DocumentExtractor;

/// Raised when extraction produced nothing but whitespace.
pub const NO_USABLE_TEXT_MESSAGE: &str = "파일에서 유효한 텍스트를 읽을 수 없습니다.";

/// Raised when a view or export is requested before any result exists.
pub const UPLOAD_FIRST_MESSAGE: &str = "파일을 먼저 업로드해주세요.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Card,
    Info,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Card => write!(f, "card"),
            Tab::Info => write!(f, "info"),
        }
    }
}

impl FromStr for Tab {
    type Err = SermonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(Tab::Card),
            "info" | "infographic" => Ok(Tab::Info),
            other => Err(SermonError::Validation(format!("Unknown view: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Landing,
    Uploading,
    Results { output: SermonOutput, active_tab: Tab },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Landing => "landing",
            Step::Uploading => "uploading",
            Step::Results { .. } => "results",
        }
    }
}

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    // None for errors that stay until the next action
    expires_at: Option<Instant>,
}

impl Notice {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    step: Step,
    error: Option<Notice>,
    notice_ttl: Duration,
    location: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default().notice_ttl())
    }
}

impl AppState {
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            step: Step::Landing,
            error: None,
            notice_ttl,
            location: None,
        }
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn result(&self) -> Option<&SermonOutput> {
        match &self.step {
            Step::Results { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Active view; `Card` whenever there are no results.
    pub fn active_tab(&self) -> Tab {
        match &self.step {
            Step::Results { active_tab, .. } => *active_tab,
            _ => Tab::Card,
        }
    }

    /// Current error line. Expired notices are never returned.
    pub fn error(&self) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|notice| notice.is_live(Instant::now()))
            .map(|notice| notice.message.as_str())
    }

    pub fn clear_expired_notice(&mut self) {
        let now = Instant::now();
        if self.error.as_ref().is_some_and(|notice| !notice.is_live(now)) {
            self.error = None;
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = Some(location.into());
    }

    pub fn begin_upload(&mut self) {
        self.error = None;
        self.transition(Step::Uploading);
    }

    pub fn complete(&mut self, output: SermonOutput) {
        self.transition(Step::Results {
            output,
            active_tab: Tab::Card,
        });
    }

    /// Back to landing with the user-facing form of `error`.
    pub fn fail(&mut self, error: &SermonError) {
        let message = user_message(error);
        tracing::error!(error = %error, shown = %message, "Analysis failed");
        self.error = Some(Notice {
            message,
            expires_at: None,
        });
        self.transition(Step::Landing);
    }

    /// Switch views. Without a result a transient notice is raised instead and
    /// nothing else changes.
    pub fn select_tab(&mut self, tab: Tab) -> Result<()> {
        match &mut self.step {
            Step::Results { active_tab, .. } => {
                *active_tab = tab;
                tracing::debug!(%tab, "View selected");
                Ok(())
            }
            _ => Err(self.raise_notice(UPLOAD_FIRST_MESSAGE)),
        }
    }

    /// Fails with a transient notice when there is no result yet.
    pub fn require_result(&mut self) -> Result<&SermonOutput> {
        match self.step {
            Step::Results { ref output, .. } => Ok(output),
            _ => Err(self.raise_notice(UPLOAD_FIRST_MESSAGE)),
        }
    }

    /// Unconditional reset. Returns the location with its query stripped.
    pub fn go_home(&mut self) -> Option<String> {
        self.error = None;
        self.transition(Step::Landing);
        if let Some(location) = self.location.as_mut() {
            *location = export::strip_query(location);
        }
        self.location.clone()
    }

    // A newer notice replaces the older one together with its deadline
    fn raise_notice(&mut self, message: &str) -> SermonError {
        tracing::warn!(message, "Validation notice");
        self.error = Some(Notice {
            message: message.to_string(),
            expires_at: Some(Instant::now() + self.notice_ttl),
        });
        SermonError::Validation(message.to_string())
    }

    fn transition(&mut self, next: Step) {
        tracing::info!(from = self.step.name(), to = next.name(), "State transition");
        self.step = next;
    }
}

/// The extraction and generation pipeline bound to one [`AppState`].
pub struct SermonApp<E, G> {
    state: AppState,
    extractor: E,
    generator: G,
    share_base_url: String,
    share_param: String,
}

impl<E, G> SermonApp<E, G>
where
    E: DocumentExtractor,
    G: ContentGenerator,
{
    pub fn new(extractor: E, generator: G, config: &AppConfig) -> Self {
        Self {
            state: AppState::new(config.notice_ttl()),
            extractor,
            generator,
            share_base_url: config.share_base_url.clone(),
            share_param: config.share_param.clone(),
        }
    }

    /// Start from a location, restoring a shared result when one is encoded in it.
    pub fn from_location(extractor: E, generator: G, config: &AppConfig, location: &str) -> Self {
        let mut app = Self::new(extractor, generator, config);
        app.restore_from_location(location);
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Returns whether a result was restored. Malformed payloads leave the state untouched.
    pub fn restore_from_location(&mut self, location: &str) -> bool {
        self.state.set_location(location);
        match export::output_from_location(location, &self.share_param) {
            Some(output) => {
                tracing::info!("Restored shared result");
                self.state.complete(output);
                true
            }
            None => false,
        }
    }

    /// Extract, then generate. Failures are also recorded in the state.
    pub async fn upload(&mut self, file: UploadedFile) -> Result<()> {
        self.state.begin_upload();
        let outcome = self.analyze_file(file).await;
        self.settle(outcome)
    }

    /// Read a file from disk and analyze it. An unreadable file fails the
    /// upload like any other extraction error.
    pub async fn upload_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.state.begin_upload();
        let outcome = match UploadedFile::from_path(path).await {
            Ok(file) => self.analyze_file(file).await,
            Err(e) => Err(SermonError::Extraction(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        };
        self.settle(outcome)
    }

    /// Generate from text the user pasted directly.
    pub async fn submit_text(&mut self, text: &str) -> Result<()> {
        self.state.begin_upload();
        let outcome = self.analyze_text(text).await;
        self.settle(outcome)
    }

    pub fn select_tab(&mut self, tab: Tab) -> Result<()> {
        self.state.select_tab(tab)
    }

    pub fn go_home(&mut self) -> Option<String> {
        self.state.go_home()
    }

    pub fn clipboard_text(&mut self) -> Result<String> {
        let output = self.state.require_result()?;
        Ok(export::clipboard_text(&output.summary_card))
    }

    pub fn share_link(&mut self) -> Result<String> {
        let output = self.state.require_result()?.clone();
        export::share_link(&self.share_base_url, &self.share_param, &output)
    }

    async fn analyze_file(&self, file: UploadedFile) -> Result<SermonOutput> {
        let text = self.extractor.extract(file).await?;
        self.analyze_text(&text).await
    }

    async fn analyze_text(&self, text: &str) -> Result<SermonOutput> {
        if text.trim().is_empty() {
            return Err(SermonError::Extraction(NO_USABLE_TEXT_MESSAGE.to_string()));
        }
        self.generator.generate(text).await
    }

    fn settle(&mut self, outcome: Result<SermonOutput>) -> Result<()> {
        match outcome {
            Ok(output) => {
                self.state.complete(output);
                Ok(())
            }
            Err(e) => {
                self.state.fail(&e);
                Err(e)
            }
        }
    }
}
