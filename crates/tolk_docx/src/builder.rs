use chrono::Utc;
use docx_rs::{AlignmentType, Docx, Hyperlink, HyperlinkType, Paragraph, Run};
use serde::{Deserialize, Serialize};
use tolk_core::protocol::split_translations;
use tolk_core::{Error, Result};

use crate::markdown::{parse_markdown_runs, TextRun};

/// Content type of an OOXML word-processing package.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Office's default hyperlink blue.
const LINK_COLOR: &str = "0563C1";
/// Title size in half-points (16pt).
const TITLE_SIZE: usize = 32;

/// What the assembler needs to know about each article: its heading and
/// where the text came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleMeta {
    pub title: String,
    pub url: String,
}

pub fn suggested_filename() -> String {
    format!("tolge-{}.docx", Utc::now().format("%Y-%m-%d"))
}

/// Assembles the finished translation into a docx payload: per article a
/// title heading, a hyperlink back to the source, and the translated
/// paragraphs with their markdown links turned into live hyperlinks.
pub fn build_document(articles: &[ArticleMeta], translation: &str) -> Result<Vec<u8>> {
    let segments = split_translations(translation, articles.len());
    let mut docx = Docx::new();

    for (index, (article, segment)) in articles.iter().zip(&segments).enumerate() {
        if index > 0 {
            docx = docx.add_paragraph(separator_paragraph());
        }
        docx = docx
            .add_paragraph(title_paragraph(&article.title))
            .add_paragraph(source_paragraph(&article.url));
        for paragraph in segment.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            docx = docx.add_paragraph(body_paragraph(paragraph));
        }
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| Error::Document(format!("failed to pack docx payload: {e}")))?;
    Ok(buffer.into_inner())
}

fn title_paragraph(title: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(title).bold().size(TITLE_SIZE))
}

fn source_paragraph(url: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text("Allikas: "))
        .add_hyperlink(
            Hyperlink::new(link_target(url), HyperlinkType::External).add_run(link_run(url)),
        )
}

fn body_paragraph(text: &str) -> Paragraph {
    let mut paragraph = Paragraph::new();
    for run in parse_markdown_runs(text) {
        paragraph = match run {
            TextRun::Plain(text) => paragraph.add_run(Run::new().add_text(text)),
            TextRun::Link(link) => paragraph.add_hyperlink(
                Hyperlink::new(link_target(&link.url), HyperlinkType::External)
                    .add_run(link_run(&link.anchor_text)),
            ),
        };
    }
    paragraph
}

fn link_run(text: &str) -> Run {
    Run::new().add_text(text).color(LINK_COLOR).underline("single")
}

/// `www.` targets need a scheme for the docx relationship to resolve;
/// the visible text keeps the original form.
fn link_target(url: &str) -> String {
    if url.starts_with("www.") {
        format!("https://{url}")
    } else {
        url.to_string()
    }
}

fn separator_paragraph() -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(Run::new().add_text("* * *"))
}
