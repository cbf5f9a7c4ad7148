//! Prompt template for sermon analysis.
//!
//! The template uses plain `format!()` interpolation; the sermon text is
//! embedded verbatim between `===` fences.

use std::sync::OnceLock;

use regex::Regex;

/// Leading list numbering: `1.`, `2)`, `(3)`, `제4강`, `①`.
fn numbering_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:\d{1,3}\s*[.)]|\(\d{1,3}\)|제\s*\d+\s*[강장편과회부]|[①-⑳])\s*")
            .expect("numbering pattern is valid")
    })
}

/// Leading dates such as `2024.03.10`, `2024-3-10 (주일)`, `2024년 3월 10일`.
fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*\d{2,4}\s*[./\-년]\s*\d{1,2}\s*[./\-월]\s*\d{1,2}\s*[.일]?\s*(?:\([^)]*\))?\s*[,:\-]?\s*",
        )
        .expect("date pattern is valid")
    })
}

/// Leading service names such as `주일예배`, `수요 말씀:`, `새벽기도회 -`.
fn service_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:주일|수요|금요|새벽|철야|특별)\s*(?:낮|오후|저녁|밤)?\s*(?:예배|말씀|설교|기도회)\s*[:\-]?\s*",
        )
        .expect("service pattern is valid")
    })
}

/// Bracketed scripture references anywhere in the line: `(요 3:16)`, `[마태복음 5장]`.
fn scripture_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*[\[(（【][^\])）】]*\d+\s*(?:[:：]|장)[^\])）】]*[\])）】]\s*")
            .expect("scripture pattern is valid")
    })
}

/// The title the model is told to use: the first non-empty line of the text,
/// with leading numbering, dates and service names and any bracketed
/// scripture reference removed. Falls back to the raw line when nothing is left.
///
/// # Example
/// ```
/// use sermoncard::llm::prompts::title_candidate;
///
/// let title = title_candidate("1. 2024.03.10 주일예배 믿음의 길 (요 3:16)\n본문");
/// assert_eq!(title.as_deref(), Some("믿음의 길"));
/// ```
pub fn title_candidate(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;

    let mut title = line.to_string();
    loop {
        let before = title.len();
        for re in [date_re(), numbering_re(), service_re()] {
            title = re.replace(&title, "").into_owned();
        }
        if title.len() == before {
            break;
        }
    }
    title = scripture_ref_re().replace_all(&title, " ").into_owned();

    let cleaned = title.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = cleaned.trim_matches(|c: char| matches!(c, '-' | ':' | ',' | '·')).trim();

    if cleaned.is_empty() {
        Some(line.to_string())
    } else {
        Some(cleaned.to_string())
    }
}

/// Build the single instruction message sent for one sermon.
///
/// # Example
/// ```
/// use sermoncard::llm::prompts::sermon_analysis_prompt;
///
/// let prompt = sermon_analysis_prompt("믿음의 길\n본문 내용");
/// assert!(prompt.contains("믿음의 길\n본문 내용"));
/// ```
pub fn sermon_analysis_prompt(text: &str) -> String {
    let title = title_candidate(text).unwrap_or_default();

    format!(
        r#"당신은 기독교 말씀 콘텐츠 디자이너입니다. 다음 [입력 말씀 텍스트]를 분석하여 요약 카드와 인포그래픽 문구를 작성하세요.

[강력 준수 규칙 - 필수]
1. **오직 제공된 텍스트 내의 정보만 사용하십시오.** 당신이 가진 배경지식이나 성경적 상식을 절대 추가하지 마십시오.
2. **제목(Subject 및 Title) 설정:** [입력 말씀 텍스트]의 첫 번째 줄(말씀의 원본 제목)을 사용하되, 앞에 붙은 번호, 날짜와 예배 이름, 괄호 안의 성경 구절 표기는 제거하십시오. 나머지는 토씨 하나 틀리지 않고 글자 그대로 사용하며 임의로 요약하거나 바꾸지 마십시오.
   - 이 규칙을 적용한 제목: {title}
3. 모든 요약 문구와 실천 포인트는 본문의 맥락과 단어를 충실히 따르십시오.
4. 응답은 지정된 JSON 형식으로만 작성하십시오.

[입력 말씀 텍스트]
===
{text}
==="#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text_verbatim() {
        let text = "  첫 줄\n\n  들여쓴 본문 (요 3:16)  \n";
        let prompt = sermon_analysis_prompt(text);
        assert!(prompt.contains(&format!("===\n{text}\n===")));
    }

    #[test]
    fn test_prompt_carries_the_title_rule() {
        let prompt = sermon_analysis_prompt("제3강 새 계명\n서로 사랑하라");
        assert!(prompt.contains("이 규칙을 적용한 제목: 새 계명"));
        assert!(prompt.contains("오직 제공된 텍스트 내의 정보만 사용하십시오"));
    }

    #[test]
    fn test_title_plain_first_line_is_verbatim() {
        assert_eq!(
            title_candidate("\n\n  하나님의 때를 기다리라  \n본문").as_deref(),
            Some("하나님의 때를 기다리라")
        );
    }

    #[test]
    fn test_title_strips_numbering() {
        assert_eq!(title_candidate("2) 빛과 소금").as_deref(), Some("빛과 소금"));
        assert_eq!(title_candidate("(12) 빛과 소금").as_deref(), Some("빛과 소금"));
        assert_eq!(title_candidate("① 빛과 소금").as_deref(), Some("빛과 소금"));
    }

    #[test]
    fn test_title_strips_dates_and_services() {
        assert_eq!(
            title_candidate("2024년 3월 10일 주일 낮 예배 - 믿음의 길").as_deref(),
            Some("믿음의 길")
        );
        assert_eq!(
            title_candidate("2024.03.10(주일) 수요말씀: 믿음의 길").as_deref(),
            Some("믿음의 길")
        );
    }

    #[test]
    fn test_title_strips_bracketed_scripture() {
        assert_eq!(
            title_candidate("믿음의 길 [마태복음 5장 3-10절]").as_deref(),
            Some("믿음의 길")
        );
        assert_eq!(
            title_candidate("믿음의 (요 3:16) 길").as_deref(),
            Some("믿음의 길")
        );
    }

    #[test]
    fn test_title_keeps_words_that_only_look_like_services() {
        assert_eq!(
            title_candidate("주일을 거룩히 지키라").as_deref(),
            Some("주일을 거룩히 지키라")
        );
    }

    #[test]
    fn test_title_falls_back_when_everything_is_stripped() {
        assert_eq!(
            title_candidate("2024.03.10 주일예배").as_deref(),
            Some("2024.03.10 주일예배")
        );
    }

    #[test]
    fn test_title_of_blank_text() {
        assert_eq!(title_candidate(" \n\t "), None);
    }
}
