use std::sync::Arc;

use tolk_core::TextGenerator;
use tolk_extract::ArticleExtractor;
use tolk_inference::SessionStore;

pub struct AppState {
    pub store: SessionStore,
    pub extractor: ArticleExtractor,
    pub model: Arc<dyn TextGenerator>,
}
