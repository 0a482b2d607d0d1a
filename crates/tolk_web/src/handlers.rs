use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use tolk_core::{ConversationTurn, Error, RoundOutcome, Session, TranslationConfig};
use tolk_docx::{build_document, suggested_filename, DOCX_CONTENT_TYPE};
use tolk_inference::orchestrator::run_round;
use tolk_inference::SessionStore;
use tracing::info;

use crate::api::{
    AnswerRequest, ArticleSummary, DownloadRequest, ScrapeRequest, ScrapeResponse,
    TranslateRequest, TranslateResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScrapeRequest>,
) -> ApiResult<Json<ScrapeResponse>> {
    if request.api_key.trim().is_empty() {
        return Err(Error::Validation("API key is required".to_string()).into());
    }
    if request.urls.is_empty() {
        return Err(Error::Validation("at least one URL is required".to_string()).into());
    }

    let (articles, failures) = state
        .extractor
        .extract_all(&request.urls, &request.estonian_titles)
        .await;

    if articles.is_empty() {
        let details = failures
            .iter()
            .map(|f| format!("{}: {}", f.url, f.error))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Extraction(format!("failed to scrape any articles: {details}")).into());
    }

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(SessionStore::generate_id);
    let summaries: Vec<ArticleSummary> = articles.iter().map(ArticleSummary::from).collect();

    let session = Session {
        id: session_id.clone(),
        articles,
        history: Vec::new(),
        config: TranslationConfig {
            api_key: request.api_key,
            system_prompt: request.system_prompt,
            custom_instructions: request.custom_instructions,
        },
    };
    info!(
        "Session {} created with {} article(s), {} failure(s)",
        session.id,
        session.articles.len(),
        failures.len()
    );
    state.store.insert(session).await;

    Ok(Json(ScrapeResponse {
        session_id,
        articles: summaries,
        errors: (!failures.is_empty()).then_some(failures),
    }))
}

pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranslateRequest>,
) -> ApiResult<Json<TranslateResponse>> {
    run_session_round(&state, &request.session_id, None).await
}

pub async fn answer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnswerRequest>,
) -> ApiResult<Json<TranslateResponse>> {
    if request.answer.trim().is_empty() {
        return Err(Error::Validation("answer must not be empty".to_string()).into());
    }
    run_session_round(&state, &request.session_id, Some(request.answer)).await
}

/// One orchestration round against a stored session. A completed round
/// destroys the session; a clarifying round leaves it in place for the
/// caller's answer.
async fn run_session_round(
    state: &AppState,
    session_id: &str,
    answer: Option<String>,
) -> ApiResult<Json<TranslateResponse>> {
    let session = state
        .store
        .get(session_id)
        .await
        .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

    let mut session = session.lock().await;
    if let Some(answer) = answer {
        session.history.push(ConversationTurn::user(answer));
    }

    let outcome = run_round(&mut session, state.model.as_ref()).await?;
    match outcome {
        RoundOutcome::Complete { translation } => {
            drop(session);
            state.store.remove(session_id).await;
            Ok(Json(TranslateResponse::Complete { translation }))
        }
        RoundOutcome::NeedsInput { question } => Ok(Json(TranslateResponse::NeedsInput {
            question,
            session_id: session_id.to_string(),
        })),
    }
}

pub async fn download(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<DownloadRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.translation.trim().is_empty() {
        return Err(Error::Validation("translation payload is empty".to_string()).into());
    }
    let payload = build_document(&request.articles, &request.translation).map_err(ApiError::from)?;
    info!(
        "Assembled document for {} article(s) ({} bytes)",
        request.articles.len(),
        payload.len()
    );

    let headers = [
        (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", suggested_filename()),
        ),
    ];
    Ok((headers, payload))
}
