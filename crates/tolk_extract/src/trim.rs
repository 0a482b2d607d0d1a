//! Detects and removes a tail run of "related article" teaser headlines
//! appended after the real article body. Heuristic by nature; the
//! thresholds below are tuning knobs, not contract.

/// Character window for a teaser-headline paragraph.
const HEADLINE_MIN_LEN: usize = 30;
const HEADLINE_MAX_LEN: usize = 200;
/// A paragraph longer than this is body prose, never a teaser.
const PROSE_LEN: usize = 300;
/// Consecutive headline-like paragraphs that mark a trailing list.
const RUN_TRIGGER: usize = 5;
/// A cutoff is applied only when it removes at least this many paragraphs.
const MIN_REMOVED: usize = 4;
/// Texts with fewer paragraphs cannot exhibit the pattern.
const MIN_PARAGRAPHS: usize = 3;

/// Words a headline-style teaser rarely starts with: articles, pronouns,
/// and the lead-ins of narrative prose.
const LEAD_IN_WORDS: [&str; 38] = [
    "the", "a", "an", "it", "its", "this", "that", "these", "those", "he", "she", "they", "we",
    "i", "you", "there", "his", "her", "their", "scientists", "researchers", "according", "in",
    "on", "at", "for", "but", "and", "while", "when", "after", "before", "as", "if", "although",
    "however", "meanwhile", "now",
];

fn is_headline_like(paragraph: &str) -> bool {
    let len = paragraph.chars().count();
    if len < HEADLINE_MIN_LEN || len > HEADLINE_MAX_LEN {
        return false;
    }
    if paragraph.matches('.').count() > 1 {
        return false;
    }
    let first = paragraph
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    !LEAD_IN_WORDS.contains(&first.as_str())
}

/// Scans paragraphs from the end backward and truncates a detected
/// trailing teaser list. Returns the text unchanged when the pattern is
/// absent or ambiguous.
pub fn trim_trailing_list(content: &str) -> String {
    let paragraphs: Vec<&str> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.len() < MIN_PARAGRAPHS {
        return content.to_string();
    }

    let mut run = 0usize;
    let mut cutoff = None;
    for index in (0..paragraphs.len()).rev() {
        let paragraph = paragraphs[index];
        // Long prose means we are back inside the article body.
        if paragraph.chars().count() > PROSE_LEN {
            break;
        }
        if is_headline_like(paragraph) {
            run += 1;
            if run >= RUN_TRIGGER {
                cutoff = Some(index);
            }
        } else {
            run = 0;
        }
    }

    match cutoff {
        Some(index) if paragraphs.len() - index >= MIN_REMOVED => {
            paragraphs[..index].join("\n\n")
        }
        _ => content.to_string(),
    }
}
