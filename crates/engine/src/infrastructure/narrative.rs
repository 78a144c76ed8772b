//! Narrative source adapters.

use async_trait::async_trait;

use crate::infrastructure::ports::{NarrativeError, NarrativePort, NarrativeRequest};

/// Returns the same prerecorded prose for every request.
///
/// Backs the replay binary, where the narrative of a past turn is already known.
#[derive(Debug, Clone)]
pub struct FixedNarrative {
    text: String,
}

impl FixedNarrative {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl NarrativePort for FixedNarrative {
    async fn generate(&self, request: NarrativeRequest) -> Result<String, NarrativeError> {
        tracing::debug!(
            prompt_chars = request.prompt.chars().count(),
            "Serving prerecorded narrative"
        );
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_prerecorded_text() {
        let narrative = FixedNarrative::new("守卫倒下了。");
        let text = narrative
            .generate(NarrativeRequest::new("我攻击守卫"))
            .await
            .expect("fixed narrative never fails");
        assert_eq!(text, "守卫倒下了。");
    }
}
