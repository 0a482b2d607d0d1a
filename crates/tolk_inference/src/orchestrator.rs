use tolk_core::protocol::{parse_response, RoundOutcome, COMPLETION_SENTINEL};
use tolk_core::{Article, ConversationTurn, Result, Session, TextGenerator, TranslationConfig};
use tracing::info;

const DEFAULT_SYSTEM_PROMPT: &str = "You are an experienced Estonian news editor and \
translator. Translate the articles below into Estonian at publication quality: natural, \
idiomatic Estonian that reads as if it had been written for an Estonian science desk. \
Preserve the factual content and the paragraph structure of each article.";

/// The fixed guidance block describing the required output contract.
fn output_contract(article_count: usize) -> String {
    format!(
        "If anything essential is unclear (tone, audience, terminology), reply with your \
         questions only and nothing else. Once you can produce the final translation, reply \
         with the token {COMPLETION_SENTINEL} followed by the translation of every article \
         in order, separated by a line containing three dashes (---). There are \
         {article_count} article(s). Keep every markdown link ([text](url)) intact, \
         translating only the link text, never the URL."
    )
}

fn render_article(index: usize, total: usize, article: &Article) -> String {
    format!(
        "Article {} of {}\nURL: {}\nTitle: {}\n\n{}",
        index + 1,
        total,
        article.url,
        article.title,
        article.content
    )
}

/// The opening user message: system prompt, optional extra instructions,
/// the output contract, and every article rendered in full.
fn build_initial_prompt(articles: &[Article], config: &TranslationConfig) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        config
            .system_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT),
    );
    prompt.push_str("\n\n");

    if let Some(custom) = config
        .custom_instructions
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    {
        prompt.push_str("Additional instructions from the editor:\n");
        prompt.push_str(custom);
        prompt.push_str("\n\n");
    }

    prompt.push_str(&output_contract(articles.len()));
    prompt.push_str("\n\n");

    for (index, article) in articles.iter().enumerate() {
        prompt.push_str(&render_article(index, articles.len(), article));
        prompt.push_str("\n\n");
    }
    prompt
}

/// Runs one orchestration round. An empty history means this is the first
/// round and the initial prompt is built from the session's articles;
/// otherwise the existing history is sent verbatim (the caller appends the
/// human's answer turn before re-entering). A clarification response is
/// appended to the history; a completion leaves the history untouched so
/// the caller can destroy the session.
pub async fn run_round(session: &mut Session, model: &dyn TextGenerator) -> Result<RoundOutcome> {
    if session.history.is_empty() {
        let prompt = build_initial_prompt(&session.articles, &session.config);
        session.history.push(ConversationTurn::user(prompt));
    }

    info!(
        "Dispatching round for session {} ({} turn(s), via {})",
        session.id,
        session.history.len(),
        model.name()
    );
    let response = model.generate(&session.config.api_key, &session.history).await?;

    let outcome = parse_response(&response);
    match &outcome {
        RoundOutcome::NeedsInput { question } => {
            session.history.push(ConversationTurn::model(question.clone()));
            info!("Session {} needs clarification", session.id);
        }
        RoundOutcome::Complete { .. } => {
            info!("Session {} translation complete", session.id);
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tolk_core::Role;

    struct StubGenerator {
        response: String,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate(
            &self,
            _api_key: &str,
            _history: &[ConversationTurn],
        ) -> Result<String> {
            Ok(self.response.clone())
        }
    }

    fn article(url: &str, title: &str) -> Article {
        Article {
            url: url.to_string(),
            title: title.to_string(),
            estonian_title: None,
            content: "Paragraph one.\n\nParagraph two.".to_string(),
        }
    }

    fn session_with_articles() -> Session {
        Session {
            id: "abc123".to_string(),
            articles: vec![
                article("https://example.com/1", "First"),
                article("https://example.com/2", "Second"),
            ],
            history: vec![],
            config: TranslationConfig {
                api_key: "key".to_string(),
                system_prompt: None,
                custom_instructions: Some("Keep measurements metric.".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_first_round_builds_the_initial_prompt() {
        let mut session = session_with_articles();
        let model = StubGenerator {
            response: "Which audience is this for?".to_string(),
        };
        run_round(&mut session, &model).await.unwrap();

        let opening = &session.history[0];
        assert_eq!(opening.role, Role::User);
        assert!(opening.text.contains(COMPLETION_SENTINEL));
        assert!(opening.text.contains("Keep measurements metric."));
        assert!(opening.text.contains("Article 1 of 2"));
        assert!(opening.text.contains("https://example.com/2"));
        assert!(opening.text.contains("Paragraph one."));
    }

    #[tokio::test]
    async fn test_clarification_appends_a_model_turn() {
        let mut session = session_with_articles();
        let model = StubGenerator {
            response: "Please clarify the tone.".to_string(),
        };
        let outcome = run_round(&mut session, &model).await.unwrap();

        assert_eq!(
            outcome,
            RoundOutcome::NeedsInput {
                question: "Please clarify the tone.".to_string()
            }
        );
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[1].role, Role::Model);
        assert_eq!(session.history[1].text, "Please clarify the tone.");
    }

    #[tokio::test]
    async fn test_completion_leaves_history_untouched() {
        let mut session = session_with_articles();
        let model = StubGenerator {
            response: format!("{COMPLETION_SENTINEL}\nEsimene\n---\nTeine"),
        };
        let outcome = run_round(&mut session, &model).await.unwrap();

        assert_eq!(
            outcome,
            RoundOutcome::Complete {
                translation: "Esimene\n---\nTeine".to_string()
            }
        );
        // Only the initial prompt; the completion is not recorded.
        assert_eq!(session.history.len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_rounds_reuse_history_verbatim() {
        let mut session = session_with_articles();
        session.history = vec![
            ConversationTurn::user("initial prompt"),
            ConversationTurn::model("Which audience?"),
            ConversationTurn::user("General public."),
        ];
        let model = StubGenerator {
            response: format!("{COMPLETION_SENTINEL}\nValmis"),
        };
        run_round(&mut session, &model).await.unwrap();
        // No new prompt was prepended.
        assert_eq!(session.history[0].text, "initial prompt");
        assert_eq!(session.history.len(), 3);
    }
}
