pub mod error;
pub mod models;
pub mod protocol;
pub mod types;

pub use error::Error;
pub use models::TextGenerator;
pub use protocol::RoundOutcome;
pub use types::{Article, ConversationTurn, ParsedLink, Role, Session, TranslationConfig};

pub type Result<T> = std::result::Result<T, Error>;
