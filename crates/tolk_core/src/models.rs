use async_trait::async_trait;

use crate::types::ConversationTurn;
use crate::Result;

/// Seam to the external text-generation service. The orchestrator only
/// ever talks to the model through this trait, so rounds can be tested
/// with a stub generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name of the backing service.
    fn name(&self) -> &str;

    /// Send the conversation so far and return the model's reply.
    async fn generate(&self, api_key: &str, history: &[ConversationTurn]) -> Result<String>;
}
