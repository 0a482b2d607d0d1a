use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Structural hints for the article container, in descending specificity
/// order. The first acceptable candidate wins.
const CONTENT_SELECTORS: [&str; 16] = [
    ".article-main",
    ".entry-content",
    "article .entry-content",
    ".post-content",
    ".article-content",
    ".article-body",
    "article",
    "[role=\"main\"]",
    ".content",
    ".post",
    ".single-post",
    ".entry",
    "#content",
    "#main-content",
    "main article",
    "main",
];

/// A candidate qualifies with this much text even without paragraph tags.
const MIN_CANDIDATE_TEXT: usize = 150;
/// A candidate qualifies with this many paragraph elements even when short.
const MIN_CANDIDATE_PARAGRAPHS: usize = 3;

/// Picks the best article container from the cascade, falling back to the
/// document body when no structural hint qualifies.
pub fn select_content_container(document: &Html) -> Option<ElementRef<'_>> {
    let paragraph = Selector::parse("p").unwrap();
    for raw in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text_len = flattened_text(&element).len();
            let paragraphs = element.select(&paragraph).count();
            if text_len > MIN_CANDIDATE_TEXT || paragraphs >= MIN_CANDIDATE_PARAGRAPHS {
                debug!("Selected content container via {}", raw);
                return Some(element);
            }
        }
    }
    debug!("No content container qualified, falling back to body");
    let body = Selector::parse("body").unwrap();
    document.select(&body).next()
}

/// The element's full text with runs of whitespace collapsed to single
/// spaces. Used both for candidate scoring and as the unstructured
/// extraction fallback.
pub fn flattened_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_paragraph(n: usize) -> String {
        "Sisu lause mis venib piisavalt pikaks et lävend ületada. ".repeat(n)
    }

    #[test]
    fn test_first_qualifying_selector_wins() {
        // Both .entry-content and article qualify; .entry-content is
        // earlier in the cascade and must win.
        let html = format!(
            r#"<html><body>
                <article><p>{0}</p><p>{0}</p><p>{0}</p></article>
                <div class="entry-content"><p>{0}</p><p>{0}</p><p>{0}</p><p>marker-entry</p></div>
            </body></html>"#,
            long_paragraph(2)
        );
        let document = Html::parse_document(&html);
        let container = select_content_container(&document).unwrap();
        assert!(flattened_text(&container).contains("marker-entry"));
    }

    #[test]
    fn test_three_paragraphs_qualify_a_short_candidate() {
        let html = r#"<html><body>
            <article><p>one</p><p>two</p><p>three</p></article>
        </body></html>"#;
        let document = Html::parse_document(html);
        let container = select_content_container(&document).unwrap();
        assert_eq!(container.value().name(), "article");
    }

    #[test]
    fn test_short_candidates_fall_back_to_body() {
        let html = r#"<html><body>
            <article><p>too short</p></article>
            <p>body text outside any container</p>
        </body></html>"#;
        let document = Html::parse_document(html);
        let container = select_content_container(&document).unwrap();
        assert_eq!(container.value().name(), "body");
    }

    #[test]
    fn test_long_text_qualifies_without_paragraphs() {
        let html = format!(
            r#"<html><body><div class="article-body">{}</div></body></html>"#,
            long_paragraph(4)
        );
        let document = Html::parse_document(&html);
        let container = select_content_container(&document).unwrap();
        assert_eq!(container.value().name(), "div");
    }
}
