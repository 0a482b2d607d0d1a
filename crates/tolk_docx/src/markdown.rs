use tolk_core::ParsedLink;

/// One run of paragraph text: plain, or a live hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRun {
    Plain(String),
    Link(ParsedLink),
}

/// Splits a paragraph into plain and hyperlink runs with a left-to-right
/// scan for `[text](url)` tokens. Matches whose URL does not look like a
/// web address are kept as literal bracket text.
pub fn parse_markdown_runs(text: &str) -> Vec<TextRun> {
    let chars: Vec<char> = text.chars().collect();
    let mut runs = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '[' {
            if let Some((anchor_text, url, consumed)) = match_link(&chars[i..]) {
                if is_linkable(&url) {
                    if !plain.is_empty() {
                        runs.push(TextRun::Plain(std::mem::take(&mut plain)));
                    }
                    runs.push(TextRun::Link(ParsedLink { anchor_text, url }));
                    i += consumed;
                    continue;
                }
            }
        }
        plain.push(chars[i]);
        i += 1;
    }

    if !plain.is_empty() {
        runs.push(TextRun::Plain(plain));
    }
    runs
}

/// Matches `[text](url)` at the start of `chars`, tolerating balanced
/// parentheses inside the URL. Returns the text, the URL, and how many
/// characters the token consumed.
fn match_link(chars: &[char]) -> Option<(String, String, usize)> {
    let close = chars.iter().position(|&c| c == ']')?;
    if chars.get(close + 1) != Some(&'(') {
        return None;
    }
    let mut depth = 1usize;
    let mut end = close + 2;
    while end < chars.len() {
        match chars[end] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        end += 1;
    }
    if end >= chars.len() {
        return None;
    }
    let text: String = chars[1..close].iter().collect();
    let url: String = chars[close + 2..end].iter().collect();
    Some((text, url.trim().to_string(), end + 1))
}

fn is_linkable(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("www.")
}
