//! Typed request and response payloads, one closed pair per endpoint.

use serde::{Deserialize, Serialize};
use tolk_core::Article;
use tolk_docx::ArticleMeta;
use tolk_extract::ScrapeFailure;

const PREVIEW_LEN: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub api_key: String,
    pub urls: Vec<String>,
    #[serde(default)]
    pub estonian_titles: Vec<Option<String>>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub session_id: String,
    pub articles: Vec<ArticleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ScrapeFailure>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub title: String,
    pub url: String,
    pub content_preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estonian_title: Option<String>,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
            content_preview: preview(&article.content),
            estonian_title: article.estonian_title.clone(),
        }
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_LEN {
        content.to_string()
    } else {
        format!("{}...", content.chars().take(PREVIEW_LEN).collect::<String>())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub session_id: String,
    pub answer: String,
}

/// A round either finishes the translation or comes back with the model's
/// clarification question and the session to answer into.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TranslateResponse {
    Complete { translation: String },
    #[serde(rename_all = "camelCase")]
    NeedsInput { question: String, session_id: String },
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub translation: String,
    pub articles: Vec<ArticleMeta>,
}
