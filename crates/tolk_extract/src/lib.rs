pub mod extractor;
pub mod fetch;
pub mod links;
pub mod noise;
pub mod selectors;
pub mod trim;

pub use extractor::{ArticleExtractor, ScrapeFailure, MAX_CONTENT_LEN, MIN_CONTENT_LEN};
pub use fetch::{Fetcher, RenderProxy};
