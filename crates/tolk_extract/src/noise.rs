use lazy_static::lazy_static;
use regex::Regex;
use scraper::ElementRef;

/// Tags whose subtrees never hold article prose.
const NOISE_TAGS: [&str; 14] = [
    "script",
    "style",
    "nav",
    "header",
    "footer",
    "aside",
    "iframe",
    "form",
    "button",
    "input",
    "select",
    "noscript",
    "figure",
    "figcaption",
];

lazy_static! {
    /// Class/id fragments marking boilerplate containers: ads, share
    /// widgets, newsletter prompts, comment sections, related-article
    /// blocks, site chrome, image captions and credits.
    static ref NOISE_MARKER_RE: Regex = Regex::new(
        r"(?ix)\b(
            ads?|advert\w*|promo(tion)?s?|popup|
            social[-_]?(share|links?|follow)|share[-_]?buttons?|
            newsletter\w*|subscri\w*|cookie[-_]?notice|
            author[-_]?bio|related[-_]?(posts?|articles?|content)|
            comments?([-_]section)?|copyright|
            site[-_]?(header|footer)|editor(ial)?[-_]?note|
            caption|credit|breadcrumbs?|sidebar|menu
        )\b"
    )
    .unwrap();

    /// Line-level boilerplate patterns: bylines and date lines, legal
    /// text, calls to action, teaser headers, comment markers.
    static ref NOISE_LINE_RES: Vec<Regex> = vec![
        Regex::new(r"(?i)^(by|text|photos?|foto|autor|toimetas|toimetaja)\s*[:|]").unwrap(),
        Regex::new(r"^\d{1,2}[./]\s?\d{1,2}[./]\s?\d{2,4}").unwrap(),
        Regex::new(r"(?i)^(published|updated|posted)\s+(on|at|by)\b").unwrap(),
        Regex::new(r"(?i)(©|\(c\)\s?\d{4}|copyright|all rights reserved|kõik õigused (on )?kaitstud)")
            .unwrap(),
        Regex::new(
            r"(?i)(subscribe to|sign up for|join our|follow us|share this (article|story)|jaga artiklit|telli uudiskiri)"
        )
        .unwrap(),
        Regex::new(r"(?i)^(related articles?|read (more|also|next)|more from|see also|loe (ka|veel|lisaks))\b")
            .unwrap(),
        Regex::new(r"(?i)^(comments?|\d+\s+comments?|leave a (comment|reply)|kommenteeri)\b").unwrap(),
        Regex::new(r"(?i)^(editor'?s note|this article (was|originally)|toimetuse märkus)\b").unwrap(),
    ];
}

/// True when an extracted line is boilerplate rather than article prose.
pub fn is_noise_line(text: &str) -> bool {
    let text = text.trim();
    NOISE_LINE_RES.iter().any(|re| re.is_match(text))
}

/// True when the element itself is structural noise, by tag or by
/// class/id marker.
pub fn is_noise_element(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    if NOISE_TAGS.contains(&value.name()) {
        return true;
    }
    let mut markers = String::new();
    if let Some(id) = value.id() {
        markers.push_str(id);
        markers.push(' ');
    }
    for class in value.classes() {
        markers.push_str(class);
        markers.push(' ');
    }
    !markers.is_empty() && NOISE_MARKER_RE.is_match(&markers)
}

/// True when any element strictly between `element` and `root` is noise.
/// The scraper DOM is immutable, so noise subtrees are skipped here rather
/// than removed.
pub fn inside_noise(element: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    for ancestor in element.ancestors() {
        if ancestor.id() == root.id() {
            break;
        }
        if let Some(el) = ElementRef::wrap(ancestor) {
            if is_noise_element(&el) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_noise_lines() {
        assert!(is_noise_line("By: Jane Doe"));
        assert!(is_noise_line("Autor: Mari Maasikas"));
        assert!(is_noise_line("12.03.2024 14:55"));
        assert!(is_noise_line("© 2024 Example Media. All rights reserved."));
        assert!(is_noise_line("Subscribe to our newsletter for weekly updates"));
        assert!(is_noise_line("Related articles"));
        assert!(is_noise_line("Loe ka: varasemad uudised"));
        assert!(is_noise_line("14 comments"));
        assert!(is_noise_line("Editor's note: this story has been updated"));
    }

    #[test]
    fn test_prose_is_not_noise() {
        assert!(!is_noise_line(
            "Researchers found the comet's tail contains complex organic molecules."
        ));
        assert!(!is_noise_line(
            "The newsletter mentioned in the report was discontinued in 2019."
        ));
    }

    #[test]
    fn test_noise_elements_by_tag_and_marker() {
        let html = r#"<div>
            <nav><a href="/">Home</a></nav>
            <div class="social-share">Share</div>
            <div id="comments-section">...</div>
            <p class="lead">Real text</p>
            <div class="downloads">Files</div>
        </div>"#;
        let fragment = Html::parse_fragment(html);
        let div = Selector::parse("div, nav, p").unwrap();
        let flagged: Vec<bool> = fragment
            .select(&div)
            .map(|el| is_noise_element(&el))
            .collect();
        // Outer div, nav, .social-share, #comments-section, p.lead, .downloads
        assert_eq!(flagged, vec![false, true, true, true, false, false]);
    }

    #[test]
    fn test_inside_noise_walks_ancestors() {
        let html = r#"<article>
            <div class="related-posts"><ul><li><p>Teaser</p></li></ul></div>
            <p>Body</p>
        </article>"#;
        let fragment = Html::parse_fragment(html);
        let root = fragment
            .select(&Selector::parse("article").unwrap())
            .next()
            .unwrap();
        let paragraphs: Vec<_> = fragment
            .select(&Selector::parse("p").unwrap())
            .collect();
        assert!(inside_noise(&paragraphs[0], &root));
        assert!(!inside_noise(&paragraphs[1], &root));
    }
}
