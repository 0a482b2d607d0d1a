use serde::{Deserialize, Serialize};

/// A single extracted article. `content` is normalized markdown: paragraphs
/// separated by a blank line, hyperlinks embedded as `[anchor](url)`.
/// Immutable once produced by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estonian_title: Option<String>,
    pub content: String,
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Per-session translation settings. The API key is caller-supplied and
/// passed straight through to the text-generation service.
#[derive(Debug, Clone, Default)]
pub struct TranslationConfig {
    pub api_key: String,
    pub system_prompt: Option<String>,
    pub custom_instructions: Option<String>,
}

/// Server-held state binding a set of source articles to an in-progress
/// multi-turn model conversation. The history is append-only; the session
/// is destroyed when a round completes.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub articles: Vec<Article>,
    pub history: Vec<ConversationTurn>,
    pub config: TranslationConfig,
}

/// An inline hyperlink carried through plain-text processing stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub anchor_text: String,
    pub url: String,
}
