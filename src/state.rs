//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! read-only after startup: each request owns its own prediction job, so no
//! locks are needed here.

use std::sync::Arc;
use std::time::Duration;

use crate::llm::PredictionApi;
use crate::llm::config::PollPolicy;
use crate::llm::poll::{Sleeper, TokioSleeper};
use crate::services::generation::{GenerationContext, GenerationError};

pub const DEFAULT_DEMO_DELAY_MS: u64 = 1500;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    /// Provider client. `None` when the API token is not configured.
    pub provider: Option<Arc<dyn PredictionApi>>,
    pub sleeper: Arc<dyn Sleeper>,
    pub poll: PollPolicy,
    /// Simulated latency of the `/generate` demo endpoint.
    pub demo_delay: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(provider: Option<Arc<dyn PredictionApi>>, poll: PollPolicy) -> Self {
        Self {
            provider,
            sleeper: Arc::new(TokioSleeper),
            poll,
            demo_delay: Duration::from_millis(DEFAULT_DEMO_DELAY_MS),
        }
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    #[must_use]
    pub fn with_demo_delay(mut self, delay: Duration) -> Self {
        self.demo_delay = delay;
        self
    }

    /// Borrow the provider, timer and poll policy for one request.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NotConfigured`] when no provider is set.
    pub fn generation_context(&self) -> Result<GenerationContext<'_>, GenerationError> {
        let api = self.provider.as_deref().ok_or(GenerationError::NotConfigured)?;
        Ok(GenerationContext { api, sleeper: self.sleeper.as_ref(), policy: self.poll })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_support::{RecordingSleeper, ScriptedApi};

    #[test]
    fn unconfigured_state_has_no_generation_context() {
        let state = test_helpers::unconfigured_state();
        assert!(matches!(state.generation_context(), Err(GenerationError::NotConfigured)));
    }

    #[test]
    fn scripted_state_exposes_policy() {
        let state =
            test_helpers::scripted_state(Arc::new(ScriptedApi::new()), Arc::new(RecordingSleeper::default()));
        let ctx = state.generation_context().unwrap();
        assert_eq!(ctx.policy, PollPolicy::default());
        assert_eq!(ctx.api.model_label(), "Test Granite");
    }

    #[test]
    fn default_demo_delay() {
        let state = AppState::new(None, PollPolicy::default());
        assert_eq!(state.demo_delay, Duration::from_millis(1500));
    }
}
