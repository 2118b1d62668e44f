//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! server keeps no per-user data; the family tree lives in the browser, so the
//! state is just the optional LLM client and the token budget.

use std::sync::Arc;

use crate::llm::LlmChat;

/// Clone is required by Axum; the LLM client is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    /// `max_tokens` passed to every collaborator call.
    pub max_tokens: u32,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::config::DEFAULT_AI_MAX_TOKENS;

    /// A state with no LLM configured.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(None, DEFAULT_AI_MAX_TOKENS)
    }

    /// A state backed by the given mock LLM.
    #[must_use]
    pub fn test_app_state_with_llm(llm: Arc<dyn LlmChat>) -> AppState {
        AppState::new(Some(llm), DEFAULT_AI_MAX_TOKENS)
    }
}
