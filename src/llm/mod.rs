//! LLM: hosted prediction API adapter.
//!
//! DESIGN
//! ======
//! Jobs are asynchronous on the provider side: `replicate` creates a
//! prediction and fetches its status, `poll` drives it to a terminal state.
//! Everything above this module talks to the [`PredictionApi`] trait so the
//! provider can be scripted in tests.

pub mod config;
pub mod poll;
pub mod replicate;
pub mod types;

#[cfg(test)]
pub mod test_support;

use std::sync::Arc;

use config::ProviderConfig;
pub use types::PredictionApi;
use types::ProviderError;

/// Build the provider client from environment variables.
///
/// # Errors
///
/// Returns an error if the API token is missing or the HTTP client fails.
pub fn client_from_env() -> Result<Arc<dyn PredictionApi>, ProviderError> {
    let config = ProviderConfig::from_env()?;
    let client = replicate::ReplicateClient::new(config)?;
    Ok(Arc::new(client))
}
