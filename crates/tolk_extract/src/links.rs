use scraper::ElementRef;
use tolk_core::ParsedLink;
use url::Url;

/// Query parameters stripped from resolved link targets.
const TRACKING_PARAMS: [&str; 9] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_cid",
    "mc_eid",
];

fn placeholder(index: usize) -> String {
    format!("@@L{index}@@")
}

/// Resolves `href` against the page base, dropping tracking parameters.
/// Returns None for in-page anchors and non-HTTP protocols; their anchor
/// text stays in the output as plain text.
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }
    let mut resolved = base.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    if resolved.query().is_some() {
        let kept: Vec<(String, String)> = resolved
            .query_pairs()
            .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        resolved.set_query(None);
        if !kept.is_empty() {
            resolved
                .query_pairs_mut()
                .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }
    Some(resolved.to_string())
}

/// Collects the element's text with every qualifying anchor replaced by a
/// unique placeholder token, returning the anchors in document order.
/// The two-pass placeholder scheme keeps link positions exact no matter
/// how deeply the anchor markup is nested.
pub fn collect_text_with_placeholders(
    element: &ElementRef<'_>,
    base: &Url,
) -> (String, Vec<ParsedLink>) {
    let mut text = String::new();
    let mut links = Vec::new();
    collect_node(element, base, &mut text, &mut links);
    (text, links)
}

fn collect_node(
    element: &ElementRef<'_>,
    base: &Url,
    out: &mut String,
    links: &mut Vec<ParsedLink>,
) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(el) = ElementRef::wrap(child) {
            let name = el.value().name();
            if name == "script" || name == "style" {
                continue;
            }
            if name == "a" {
                let anchor_text = el
                    .text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                let resolved = el
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_href(base, href));
                match resolved {
                    Some(url) if !anchor_text.is_empty() => {
                        out.push_str(&placeholder(links.len()));
                        links.push(ParsedLink {
                            anchor_text,
                            url,
                        });
                    }
                    _ => out.push_str(&anchor_text),
                }
                continue;
            }
            collect_node(&el, base, out, links);
        }
    }
}

/// Substitutes each placeholder with its `[anchor](url)` markdown form.
pub fn restore_markdown_links(text: &str, links: &[ParsedLink]) -> String {
    let mut restored = text.to_string();
    for (index, link) in links.iter().enumerate() {
        let markdown = format!("[{}]({})", link.anchor_text, link.url);
        restored = restored.replace(&placeholder(index), &markdown);
    }
    restored
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_p(html: &str) -> (Html, Selector) {
        (Html::parse_fragment(html), Selector::parse("p").unwrap())
    }

    fn base() -> Url {
        Url::parse("https://news.example.com/science/story").unwrap()
    }

    #[test]
    fn test_resolve_relative_and_protocol_relative() {
        let base = base();
        assert_eq!(
            resolve_href(&base, "/about").as_deref(),
            Some("https://news.example.com/about")
        );
        assert_eq!(
            resolve_href(&base, "//cdn.example.org/paper.pdf").as_deref(),
            Some("https://cdn.example.org/paper.pdf")
        );
        assert_eq!(
            resolve_href(&base, "next-story").as_deref(),
            Some("https://news.example.com/science/next-story")
        );
    }

    #[test]
    fn test_tracking_parameters_are_dropped() {
        let base = base();
        assert_eq!(
            resolve_href(&base, "/x?utm_source=feed&id=7&utm_medium=rss").as_deref(),
            Some("https://news.example.com/x?id=7")
        );
        // A query made entirely of tracking parameters disappears.
        assert_eq!(
            resolve_href(&base, "/x?utm_source=feed").as_deref(),
            Some("https://news.example.com/x")
        );
    }

    #[test]
    fn test_skipped_protocols() {
        let base = base();
        assert_eq!(resolve_href(&base, "#comments"), None);
        assert_eq!(resolve_href(&base, "javascript:void(0)"), None);
        assert_eq!(resolve_href(&base, "mailto:desk@example.com"), None);
    }

    #[test]
    fn test_anchor_order_and_count_survive_nesting() {
        let (fragment, selector) = first_p(
            r#"<p>See <a href="/a">first <b>link</b></a>, then
               <span><a href="/b">second</a></span> and <a href="/c">third</a>.</p>"#,
        );
        let element = fragment.select(&selector).next().unwrap();
        let (text, links) = collect_text_with_placeholders(&element, &base());
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].anchor_text, "first link");
        assert_eq!(links[1].anchor_text, "second");
        assert_eq!(links[2].anchor_text, "third");

        let restored = restore_markdown_links(&text, &links);
        let positions: Vec<usize> = links
            .iter()
            .map(|l| restored.find(&format!("[{}]", l.anchor_text)).unwrap())
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
    }

    #[test]
    fn test_unqualified_anchor_keeps_plain_text() {
        let (fragment, selector) =
            first_p(r##"<p>Jump to <a href="#top">the top</a> of the page.</p>"##);
        let element = fragment.select(&selector).next().unwrap();
        let (text, links) = collect_text_with_placeholders(&element, &base());
        assert!(links.is_empty());
        assert_eq!(
            restore_markdown_links(&text, &links),
            "Jump to the top of the page."
        );
    }

    #[test]
    fn test_markdown_restoration() {
        let (fragment, selector) = first_p(
            r#"<p>The <a href="https://journal.example.org/doi/10.1000/xyz">study</a> was published today.</p>"#,
        );
        let element = fragment.select(&selector).next().unwrap();
        let (text, links) = collect_text_with_placeholders(&element, &base());
        assert_eq!(
            restore_markdown_links(&text, &links),
            "The [study](https://journal.example.org/doi/10.1000/xyz) was published today."
        );
    }
}
