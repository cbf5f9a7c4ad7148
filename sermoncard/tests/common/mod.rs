#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use serde_json::json;

use sermoncard::config::{AppConfig, GeminiConfig};
use sermoncard::error::{Result, SermonError};
use sermoncard::llm::{parse_sermon_output, ContentGenerator};
use sermoncard::models::{InfographicData, SermonOutput, SummaryCardData, UploadedFile};
use sermoncard::processing::DocumentExtractor;

pub const TEST_MODEL: &str = "gemini-3-flash-preview";

pub fn sample_output() -> SermonOutput {
    SermonOutput {
        summary_card: SummaryCardData {
            date: "2024.03.10".to_string(),
            subject: "믿음의 길".to_string(),
            core_message: vec![
                "믿음은 들음에서 난다".to_string(),
                "말씀 위에 서라".to_string(),
            ],
            scripture: "믿음은 들음에서 나며 들음은 그리스도의 말씀으로 말미암았느니라 (롬 10:17)"
                .to_string(),
            action_points: vec!["매일 말씀 읽기".to_string(), "감사 일기 쓰기".to_string()],
            hashtags: vec!["#믿음".to_string(), "#말씀".to_string()],
        },
        infographic: InfographicData {
            title: "믿음의 길".to_string(),
            subtitle: "들음에서 시작되는 믿음".to_string(),
            scripture: "롬 10:17".to_string(),
        },
    }
}

pub fn sample_output_json() -> String {
    serde_json::to_string(&sample_output()).expect("sample output serializes")
}

pub fn app_config(notice_ttl_ms: u64) -> AppConfig {
    AppConfig {
        notice_ttl_ms,
        share_base_url: "https://cards.example/app".to_string(),
        share_param: "data".to_string(),
    }
}

pub fn gemini_config(base_url: &str) -> GeminiConfig {
    GeminiConfig {
        model: TEST_MODEL.to_string(),
        api_key: Some("test-key".to_string()),
        base_url: base_url.to_string(),
        timeout_secs: Some(5),
    }
}

pub fn generation_path() -> String {
    format!("/models/{TEST_MODEL}:generateContent")
}

/// A `generateContent` response whose only part carries `text`.
pub fn gemini_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            {
                "content": {
                    "role": "model",
                    "parts": [{ "text": text }]
                },
                "finishReason": "STOP"
            }
        ]
    })
}

pub fn create_test_docx<F>(builder_fn: F) -> Vec<u8>
where
    F: FnOnce(docx_rs::Docx) -> docx_rs::Docx,
{
    let docx = builder_fn(docx_rs::Docx::new());
    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).expect("Failed to pack DOCX");
    buffer.into_inner()
}

/// Minimal PDF with one Helvetica text line per page and a correct xref table.
pub fn create_test_pdf(pages: &[&str]) -> Vec<u8> {
    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        String::new(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut kids = Vec::new();
    for text in pages {
        let page_id = objects.len() + 1;
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        kids.push(format!("{page_id} 0 R"));
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }
    objects[1] = format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    );

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

/// Returns fixed text for every file.
pub struct StubExtractor {
    pub text: String,
}

impl StubExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl DocumentExtractor for StubExtractor {
    async fn extract(&self, _file: UploadedFile) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Answers with a canned raw body and records every call.
#[derive(Clone)]
pub struct CountingGenerator {
    raw: String,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl CountingGenerator {
    pub fn returning(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ContentGenerator for CountingGenerator {
    async fn generate(&self, text: &str) -> Result<SermonOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("lock").push(text.to_string());
        parse_sermon_output(&self.raw)
    }
}

/// Always fails with the given error.
pub struct FailingGenerator(pub fn() -> SermonError);

#[async_trait]
impl ContentGenerator for FailingGenerator {
    async fn generate(&self, _text: &str) -> Result<SermonOutput> {
        Err((self.0)())
    }
}
