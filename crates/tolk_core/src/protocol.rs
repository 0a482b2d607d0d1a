//! The output contract the model is instructed to follow: a sentinel token
//! marks a finished translation, and per-article segments are separated by
//! a dash line. Parsing lives here, independent of the transport call, so
//! both the orchestrator and the document assembler share one reading of
//! the model's text.

/// Token the model emits to signal a finished (non-clarifying) translation.
pub const COMPLETION_SENTINEL: &str = "TRANSLATION_COMPLETE";

/// Minimum dash count for a line to separate two article translations.
const DELIMITER_MIN_DASHES: usize = 3;

/// Outcome of one model round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The payload after the sentinel, holding every article's translation.
    Complete { translation: String },
    /// The model asked for clarification instead of finishing.
    NeedsInput { question: String },
}

/// Classifies a raw model response. A response containing the sentinel is
/// complete and everything after the sentinel is the translation payload;
/// anything else is a clarification question in its entirety.
pub fn parse_response(response: &str) -> RoundOutcome {
    match response.find(COMPLETION_SENTINEL) {
        Some(pos) => RoundOutcome::Complete {
            translation: response[pos + COMPLETION_SENTINEL.len()..].trim().to_string(),
        },
        None => RoundOutcome::NeedsInput {
            question: response.trim().to_string(),
        },
    }
}

fn is_delimiter_line(line: &str) -> bool {
    let line = line.trim();
    line.len() >= DELIMITER_MIN_DASHES && line.chars().all(|c| c == '-')
}

/// Splits a completion payload into exactly `count` per-article segments,
/// in article order. A missing segment yields an empty translation, never
/// an error; surplus segments are dropped.
pub fn split_translations(payload: &str, count: usize) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in payload.lines() {
        if is_delimiter_line(line) {
            segments.push(current.join("\n").trim().to_string());
            current.clear();
        } else {
            current.push(line);
        }
    }
    segments.push(current.join("\n").trim().to_string());
    segments.resize(count, String::new());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_sentinel_is_a_question() {
        let outcome = parse_response("Please clarify the tone.");
        assert_eq!(
            outcome,
            RoundOutcome::NeedsInput {
                question: "Please clarify the tone.".to_string()
            }
        );
    }

    #[test]
    fn test_sentinel_splits_preamble_from_payload() {
        let outcome = parse_response("...ignored preamble TRANSLATION_COMPLETE\nFoo\n---\nBar");
        assert_eq!(
            outcome,
            RoundOutcome::Complete {
                translation: "Foo\n---\nBar".to_string()
            }
        );
    }

    #[test]
    fn test_split_two_articles() {
        let segments = split_translations("Foo\n---\nBar", 2);
        assert_eq!(segments, vec!["Foo".to_string(), "Bar".to_string()]);
    }

    #[test]
    fn test_split_accepts_longer_dash_lines() {
        let segments = split_translations("Esimene lõik.\n\n-------\n\nTeine lõik.", 2);
        assert_eq!(segments[0], "Esimene lõik.");
        assert_eq!(segments[1], "Teine lõik.");
    }

    #[test]
    fn test_missing_segment_yields_empty_translation() {
        let segments = split_translations("Ainus tõlge", 3);
        assert_eq!(segments[0], "Ainus tõlge");
        assert_eq!(segments[1], "");
        assert_eq!(segments[2], "");
    }

    #[test]
    fn test_surplus_segments_are_dropped() {
        let segments = split_translations("A\n---\nB\n---\nC", 2);
        assert_eq!(segments, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_dashes_inside_a_line_are_not_a_delimiter() {
        let segments = split_translations("A -- B --- C", 1);
        assert_eq!(segments, vec!["A -- B --- C".to_string()]);
    }
}
