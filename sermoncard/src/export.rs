//! Plain-text and link exports of a result.
//!
//! The clipboard template mirrors what users paste into chat apps; the share
//! link carries the whole [`SermonOutput`] as `base64(urlencode(json))` in one
//! query parameter so a result can be reopened without another generation.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine,
};
use url::Url;

use crate::error::{Result, SermonError};
use crate::models::{SermonOutput, SummaryCardData};

/// Confirmation shown after the card text was exported.
pub const COPY_CONFIRMATION: &str = "데이터가 클립보드에 복사되었습니다. ✨";

const DATE_LABEL: &str = "날짜: ";
const CORE_MESSAGE_HEADER: &str = "핵심 메시지:";
const SCRIPTURE_HEADER: &str = "성구:";
const ACTION_POINTS_HEADER: &str = "실천 포인트:";
const BULLET: &str = "• ";

/// Render the summary card into the clipboard template.
pub fn clipboard_text(card: &SummaryCardData) -> String {
    let core = card
        .core_message
        .iter()
        .map(|line| format!("{BULLET}{line}"))
        .collect::<Vec<_>>()
        .join("\n");

    let text = format!(
        "[{subject}]\n{DATE_LABEL}{date}\n\n{CORE_MESSAGE_HEADER}\n{core}\n\n{SCRIPTURE_HEADER}\n{scripture}\n\n{ACTION_POINTS_HEADER}\n{actions}\n\n{tags}",
        subject = card.subject,
        date = card.date,
        scripture = card.scripture,
        actions = card.action_points.join("\n"),
        tags = card.hashtags.join(" "),
    );

    text.trim().to_string()
}

/// Read a clipboard template back into a card.
///
/// Sections are located by their header lines, so empty sections and
/// multi-line entries survive. Returns `None` when a header is missing.
pub fn parse_clipboard_text(text: &str) -> Option<SummaryCardData> {
    let lines: Vec<&str> = text.split('\n').collect();

    let subject = lines
        .first()?
        .strip_prefix('[')?
        .strip_suffix(']')?
        .to_string();
    let date = lines
        .get(1)
        .map(|line| line.strip_prefix(DATE_LABEL).unwrap_or(line.trim_end()))
        .unwrap_or_default()
        .to_string();

    let core_at = header_index(&lines, CORE_MESSAGE_HEADER, 2)?;
    let scripture_at = header_index(&lines, SCRIPTURE_HEADER, core_at + 1)?;
    let actions_at = header_index(&lines, ACTION_POINTS_HEADER, scripture_at + 1)?;

    let core_message = bullet_items(section(&lines[core_at + 1..scripture_at]));
    let scripture = section(&lines[scripture_at + 1..actions_at]).join("\n");

    // The template was trimmed, so the tail may stop right after the header
    let tail = lines[actions_at + 1..].join("\n");
    let (actions, tags) = tail.rsplit_once("\n\n").unwrap_or((tail.as_str(), ""));

    let action_points = if actions.is_empty() {
        Vec::new()
    } else {
        actions.split('\n').map(String::from).collect()
    };

    Some(SummaryCardData {
        date,
        subject,
        core_message,
        scripture,
        action_points,
        hashtags: split_hashtags(tags),
    })
}

fn header_index(lines: &[&str], header: &str, from: usize) -> Option<usize> {
    lines
        .iter()
        .skip(from)
        .position(|line| line.trim_end() == header)
        .map(|i| i + from)
}

// Drops the blank line that separates a section from the next header
fn section<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    match lines.split_last() {
        Some((last, rest)) if last.is_empty() => rest,
        _ => lines,
    }
}

/// Lines without a bullet continue the previous item.
fn bullet_items(lines: &[&str]) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for line in lines {
        match line.strip_prefix(BULLET) {
            Some(item) => items.push(item.to_string()),
            None => match items.last_mut() {
                Some(last) => {
                    last.push('\n');
                    last.push_str(line);
                }
                None if line.is_empty() => {}
                None => items.push(line.to_string()),
            },
        }
    }
    items
}

/// Words not starting with `#` belong to the preceding tag.
fn split_hashtags(line: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for word in line.split(' ').filter(|word| !word.is_empty()) {
        match tags.last_mut() {
            Some(last) if !word.starts_with('#') => {
                last.push(' ');
                last.push_str(word);
            }
            _ => tags.push(word.to_string()),
        }
    }
    tags
}

/// Encode a result for the share parameter.
pub fn encode_share_payload(output: &SermonOutput) -> Result<String> {
    let json = serde_json::to_string(output)?;
    Ok(STANDARD.encode(urlencoding::encode(&json).as_bytes()))
}

/// Strict decode of a share payload.
pub fn decode_share_payload(payload: &str) -> Result<SermonOutput> {
    // A raw '+' in a hand-copied link comes back as a space
    let payload: String = payload
        .trim()
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();

    let bytes = STANDARD
        .decode(&payload)
        .or_else(|_| URL_SAFE.decode(&payload))
        .map_err(|e| SermonError::Validation(format!("Share payload is not base64: {e}")))?;
    let escaped = String::from_utf8(bytes)
        .map_err(|e| SermonError::Validation(format!("Share payload is not UTF-8: {e}")))?;
    let json = urlencoding::decode(&escaped)
        .map_err(|e| SermonError::Validation(format!("Share payload is not URI-encoded: {e}")))?;

    Ok(serde_json::from_str(&json)?)
}

/// Best-effort decode: malformed payloads are logged and ignored.
pub fn parse_share_payload(payload: &str) -> Option<SermonOutput> {
    match decode_share_payload(payload) {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed share payload");
            None
        }
    }
}

/// Look for the share parameter in a location and decode it.
pub fn output_from_location(location: &str, param: &str) -> Option<SermonOutput> {
    let url = match Url::parse(location) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(location, error = %e, "Ignoring unparsable location");
            return None;
        }
    };

    let (_, payload) = url.query_pairs().find(|(key, _)| key == param)?;
    parse_share_payload(&payload)
}

/// Link that reopens `output` without generating again.
pub fn share_link(base_url: &str, param: &str, output: &SermonOutput) -> Result<String> {
    let mut url = Url::parse(base_url)?;
    let payload = encode_share_payload(output)?;
    url.query_pairs_mut().clear().append_pair(param, &payload);
    Ok(url.to_string())
}

/// Drop the query string and fragment from a location.
pub fn strip_query(location: &str) -> String {
    match Url::parse(location) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => location
            .split(['?', '#'])
            .next()
            .unwrap_or(location)
            .to_string(),
    }
}
