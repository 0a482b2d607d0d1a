use futures::future::join_all;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tolk_core::{Article, Error, Result};
use tracing::{info, warn};
use url::Url;

use crate::fetch::Fetcher;
use crate::links;
use crate::noise;
use crate::selectors;
use crate::trim::trim_trailing_list;

/// Extraction below this many characters is a failure, not a partial result.
pub const MIN_CONTENT_LEN: usize = 100;
/// Extracted content is truncated to this many characters.
pub const MAX_CONTENT_LEN: usize = 50_000;
/// Minimum trimmed text for a single kept element.
const MIN_ELEMENT_LEN: usize = 20;
/// Minimum direct (non-descendant) text for a generic block container,
/// so whole sections are not re-absorbed through wrapper divs.
const MIN_DIRECT_TEXT: usize = 20;

/// A per-URL extraction failure. Failures are collected, not fatal, so one
/// bad URL never sinks the rest of the batch.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeFailure {
    pub url: String,
    pub error: String,
}

#[derive(Clone)]
pub struct ArticleExtractor {
    fetcher: Fetcher,
}

impl ArticleExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetches and extracts a single article. `estonian_title`, when given,
    /// becomes the canonical title instead of the page's own heading.
    pub async fn extract(&self, url: &str, estonian_title: Option<&str>) -> Result<Article> {
        info!("Extracting article from {}", url);
        let html = self.fetcher.fetch_html(url).await?;
        extract_from_html(url, &html, estonian_title)
    }

    /// Extracts every URL in the batch concurrently. Per-URL failures are
    /// isolated; deciding whether zero successes is fatal is the caller's
    /// call.
    pub async fn extract_all(
        &self,
        urls: &[String],
        estonian_titles: &[Option<String>],
    ) -> (Vec<Article>, Vec<ScrapeFailure>) {
        let tasks = urls.iter().enumerate().map(|(index, url)| {
            let estonian_title = estonian_titles.get(index).cloned().flatten();
            async move {
                self.extract(url, estonian_title.as_deref())
                    .await
                    .map_err(|e| {
                        warn!("Failed to extract {}: {}", url, e);
                        ScrapeFailure {
                            url: url.clone(),
                            error: e.to_string(),
                        }
                    })
            }
        });

        let mut articles = Vec::new();
        let mut failures = Vec::new();
        for result in join_all(tasks).await {
            match result {
                Ok(article) => articles.push(article),
                Err(failure) => failures.push(failure),
            }
        }
        (articles, failures)
    }
}

/// Parses already-fetched HTML into an Article. Separate from the network
/// path so extraction is testable against inline documents.
pub fn extract_from_html(url: &str, html: &str, estonian_title: Option<&str>) -> Result<Article> {
    let base = Url::parse(url)
        .map_err(|e| Error::Extraction(format!("invalid article URL {url}: {e}")))?;
    let document = Html::parse_document(html);

    let page_title = page_title(&document);
    let container = selectors::select_content_container(&document)
        .ok_or_else(|| Error::Extraction(format!("{url}: document has no body")))?;

    let mut content = structured_content(&container, &base);

    // Structured extraction came up short; fall back to flattened text,
    // container first, then the whole body.
    if content.chars().count() < MIN_CONTENT_LEN {
        content = selectors::flattened_text(&container);
    }
    if content.chars().count() < MIN_CONTENT_LEN {
        let body = Selector::parse("body").unwrap();
        if let Some(body) = document.select(&body).next() {
            content = selectors::flattened_text(&body);
        }
    }

    let content = trim_trailing_list(&content);
    let length = content.chars().count();
    if length < MIN_CONTENT_LEN {
        return Err(Error::Extraction(format!(
            "{url}: could not extract sufficient content ({length} chars)"
        )));
    }

    let title = estonian_title
        .map(str::to_string)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(page_title);

    Ok(Article {
        url: url.to_string(),
        title,
        estonian_title: estonian_title.map(str::to_string),
        content: truncate_chars(&content, MAX_CONTENT_LEN),
    })
}

/// The first-level heading's text, falling back to the document title.
fn page_title(document: &Html) -> String {
    let h1 = Selector::parse("h1").unwrap();
    let title = Selector::parse("title").unwrap();
    document
        .select(&h1)
        .next()
        .map(|el| selectors::flattened_text(&el))
        .filter(|text| !text.is_empty())
        .or_else(|| {
            document
                .select(&title)
                .next()
                .map(|el| selectors::flattened_text(&el))
        })
        .unwrap_or_default()
}

/// Walks paragraph- and heading-level elements of the container in
/// document order, rewriting anchors to markdown links and filtering
/// boilerplate, and joins the survivors into blank-line paragraphs.
fn structured_content(container: &ElementRef<'_>, base: &Url) -> String {
    let walk = Selector::parse("p, h2, h3, h4, li, blockquote, div, section").unwrap();
    let mut paragraphs: Vec<String> = Vec::new();

    for element in container.select(&walk) {
        if noise::is_noise_element(&element) || noise::inside_noise(&element, container) {
            continue;
        }
        let name = element.value().name();
        let is_block_container = matches!(name, "div" | "section");
        if is_block_container && direct_text_len(&element) < MIN_DIRECT_TEXT {
            continue;
        }

        let (raw, found_links) = links::collect_text_with_placeholders(&element, base);
        let text = links::restore_markdown_links(&raw, &found_links);
        let text = collapse_whitespace(&text);
        if text.chars().count() <= MIN_ELEMENT_LEN || noise::is_noise_line(&text) {
            continue;
        }
        paragraphs.push(text);
    }

    paragraphs.join("\n\n")
}

/// Text carried by the element's own text nodes, descendants excluded.
fn direct_text_len(element: &ElementRef<'_>) -> usize {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim().len())
        .sum()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}
