/// Best-effort UTF-8 decode. Invalid sequences become U+FFFD, a leading BOM is dropped.
///
/// This is also the fallback for `.hwp` and unknown formats, so binary input
/// yields replacement characters rather than an error.
pub struct TextExtractor;

impl TextExtractor {
    pub fn extract(bytes: &[u8]) -> String {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_text_is_kept() {
        assert_eq!(TextExtractor::extract("말씀\n본문".as_bytes()), "말씀\n본문");
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice("제목".as_bytes());
        assert_eq!(TextExtractor::extract(&bytes), "제목");
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let text = TextExtractor::extract(&[0x61, 0xFF, 0x62]);
        assert_eq!(text, "a\u{FFFD}b");
    }
}
