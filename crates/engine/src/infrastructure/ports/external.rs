//! External service port: the narrative text source.

use async_trait::async_trait;

use super::error::NarrativeError;

// =============================================================================
// Narrative Types
// =============================================================================

/// One request for narrative prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeRequest {
    /// Full prompt: the player input followed by the charged-cost lines
    pub prompt: String,
    /// The raw player input, for adapters that want it separately
    pub player_input: String,
}

impl NarrativeRequest {
    pub fn new(player_input: impl Into<String>) -> Self {
        let player_input = player_input.into();
        Self {
            prompt: player_input.clone(),
            player_input,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

/// Opaque prose generator.
///
/// Output is untrusted text. It may or may not be layered and may carry any
/// mix of effect, kill and status markup, or none.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrativePort: Send + Sync {
    async fn generate(&self, request: NarrativeRequest) -> Result<String, NarrativeError>;
}
