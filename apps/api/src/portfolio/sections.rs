//! Heuristic keyword-bounded section excerpts from raw resume text.

/// Heading keywords that terminate a captured section when they appear on a
/// later line. Target keywords are re-checked first in the scan, so a line
/// repeating the opened section's own heading keyword re-arms capture
/// instead of terminating it.
const STOP_KEYWORDS: [&str; 8] = [
    "experience",
    "education",
    "skills",
    "contact",
    "projects",
    "summary",
    "objective",
    "references",
];

/// Captured lines beyond this are dropped from the excerpt.
const MAX_LINES: usize = 3;

/// Scans `text` line by line for a section introduced by any of `keywords`
/// (case-insensitive substring match). The heading itself is discarded, but
/// inline content after a colon on the heading line ("Skills: Rust, Go")
/// counts as captured content. Capture ends at the next line naming a
/// different section. Returns up to the first three captured lines joined
/// with spaces, or an empty string when no heading matched — callers supply
/// their own default.
pub fn extract_section(text: &str, keywords: &[&str]) -> String {
    let mut capture = false;
    let mut captured: Vec<&str> = Vec::new();

    for line in text.lines() {
        let lower = line.to_lowercase();

        if keywords.iter().any(|kw| lower.contains(kw)) {
            capture = true;
            if let Some((_, rest)) = line.split_once(':') {
                let rest = rest.trim();
                if !rest.is_empty() {
                    captured.push(rest);
                }
            }
            continue;
        }

        if capture && STOP_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            break;
        }

        if capture && !line.trim().is_empty() {
            captured.push(line.trim());
        }
    }

    captured
        .into_iter()
        .take(MAX_LINES)
        .collect::<Vec<_>>()
        .join(" ")
}
