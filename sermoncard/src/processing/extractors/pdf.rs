use crate::error::{Result, SermonError};

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String> {
        // pdf-extract can panic on malformed fonts/glyphs
        let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        })) {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "PDF extraction failed");
                return Err(SermonError::Extraction(format!(
                    "PDF extraction failed: {e}"
                )));
            }
            Err(_) => {
                tracing::error!("PDF extraction panicked - likely malformed fonts");
                return Err(SermonError::Extraction(
                    "PDF extraction panicked - likely contains malformed fonts".to_string(),
                ));
            }
        };

        tracing::debug!(pages = pages.len(), "PDF pages extracted");
        Ok(join_pages(&pages))
    }
}

/// Items on a page are separated by single spaces, each page ends with a newline.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        let items: Vec<&str> = page.as_ref().split_whitespace().collect();
        text.push_str(&items.join(" "));
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_one_line_per_page() {
        let pages = ["믿음의 길\n\n요한복음 3장", "  둘째 페이지   본문 "];
        assert_eq!(join_pages(&pages), "믿음의 길 요한복음 3장\n둘째 페이지 본문\n");
    }

    #[test]
    fn test_join_pages_blank_pages_keep_their_newline() {
        let pages = ["", "text"];
        assert_eq!(join_pages(&pages), "\ntext\n");
    }

    #[test]
    fn test_join_pages_empty_document() {
        let pages: [&str; 0] = [];
        assert_eq!(join_pages(&pages), "");
    }

    #[test]
    fn test_invalid_pdf_is_an_extraction_error() {
        let err = PdfExtractor::extract(b"%PDF-garbage").unwrap_err();
        assert!(matches!(err, SermonError::Extraction(_)));
    }
}
