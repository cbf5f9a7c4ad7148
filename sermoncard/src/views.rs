use std::fmt::Write;

use crate::app::Tab;
use crate::models::{InfographicData, SermonOutput, SummaryCardData};

const RULE: &str = "────────────────────────────────";

pub fn render_summary_card(card: &SummaryCardData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", card.date);
    let _ = writeln!(out, "{}", card.subject);
    let _ = writeln!(out, "{RULE}");

    let _ = writeln!(out, "CORE MESSAGE");
    for message in &card.core_message {
        let _ = writeln!(out, "  / {message}");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "  \"{}\"", card.scripture);
    let _ = writeln!(out);

    let _ = writeln!(out, "LIFE ACTION");
    for point in &card.action_points {
        let _ = writeln!(out, "  • {point}");
    }
    let _ = writeln!(out);

    if !card.hashtags.is_empty() {
        let _ = writeln!(out, "{}", card.hashtags.join(" "));
    }
    let _ = write!(out, "{RULE}");
    out
}

pub fn render_infographic(info: &InfographicData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", info.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", info.subtitle);
    let _ = writeln!(out);
    let _ = writeln!(out, "│ {}", info.scripture);
    let _ = write!(out, "{RULE}");
    out
}

/// Render whichever view `tab` selects.
pub fn render(output: &SermonOutput, tab: Tab) -> String {
    match tab {
        Tab::Card => render_summary_card(&output.summary_card),
        Tab::Info => render_infographic(&output.infographic),
    }
}
