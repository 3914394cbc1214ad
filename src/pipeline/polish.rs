//! Transcript cleanup before speech synthesis.
//!
//! Completion models occasionally wrap output in code fences or slip into
//! markdown habits (headings, bullet lists) even when told not to. Spoken
//! narration must be plain prose, so this pass strips the markup while
//! leaving the sentences untouched.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^```[a-zA-Z]*\s*$").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").unwrap());
static BULLET_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*•]\s+").unwrap());
static BOLD_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*{1,3}([^*\n]+)\*{1,3}").unwrap());
static EXCESS_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize a raw model transcript into plain spoken-word prose.
pub fn clean_transcript(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let text = CODE_FENCE.replace_all(&text, "");
    let text = HEADING.replace_all(&text, "");
    let text = NUMBERED_ITEM.replace_all(&text, "");
    let text = BULLET_ITEM.replace_all(&text, "");
    let text = BOLD_ITALIC.replace_all(&text, "$1");
    let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");
    let trimmed = text.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
