pub mod builder;
pub mod markdown;

pub use builder::{build_document, suggested_filename, ArticleMeta, DOCX_CONTENT_TYPE};
pub use markdown::{parse_markdown_runs, TextRun};
