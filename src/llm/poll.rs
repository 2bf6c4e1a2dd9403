//! Poll loop: drive a submitted prediction to a terminal state.
//!
//! DESIGN
//! ======
//! `Pending → {Succeeded, Failed, TimedOut}` plus `Cancelled`. While the job
//! is pending and fewer than `max_attempts` fetches have been made, sleep for
//! the constant interval and fetch once. No backoff, no jitter. A fetch error
//! abandons the loop immediately and is returned as-is; it is never retried.
//!
//! Sleeping goes through [`Sleeper`] so tests can count waits without real
//! delays. Cancellation is a `watch` flag checked while sleeping.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::config::PollPolicy;
use super::types::{Prediction, PredictionApi, PredictionStatus, ProviderError};

// =============================================================================
// SLEEPER
// =============================================================================

/// Cooperative suspension between status fetches.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer.
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// =============================================================================
// CANCELLATION
// =============================================================================

/// Owner side of a cancellation flag.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observer side of a cancellation flag, passed into the poll loop.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Linked handle/token pair.
    #[must_use]
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// A token nobody can cancel.
    #[must_use]
    pub fn never() -> Self {
        let (_handle, token) = Self::pair();
        token
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle was dropped uncancelled.
    async fn cancelled(&mut self) {
        if self.rx.wait_for(|c| *c).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Terminal result of polling one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Succeeded(Prediction),
    Failed(Prediction),
    TimedOut { attempts: u32 },
    Cancelled { attempts: u32 },
}

// =============================================================================
// LOOP
// =============================================================================

/// Poll `initial` until it reaches a terminal state, the attempt bound runs
/// out, or `cancel` fires.
///
/// A job already terminal at submission returns without fetching.
///
/// # Errors
///
/// Returns the first [`ProviderError`] raised by a status fetch.
pub async fn poll_prediction(
    api: &dyn PredictionApi,
    sleeper: &dyn Sleeper,
    policy: PollPolicy,
    initial: Prediction,
    mut cancel: CancelToken,
) -> Result<PollOutcome, ProviderError> {
    let mut current = initial;
    let mut attempts: u32 = 0;

    loop {
        if let Some(outcome) = terminal_outcome(&current) {
            info!(prediction_id = %current.id, attempts, status = ?current.status, "poll: terminal");
            return Ok(outcome);
        }
        if attempts >= policy.max_attempts {
            warn!(prediction_id = %current.id, attempts, "poll: attempt bound exhausted");
            return Ok(PollOutcome::TimedOut { attempts });
        }
        if cancel.is_cancelled() {
            return Ok(PollOutcome::Cancelled { attempts });
        }

        tokio::select! {
            () = sleeper.sleep(policy.interval) => {}
            () = cancel.cancelled() => {
                info!(prediction_id = %current.id, attempts, "poll: cancelled");
                return Ok(PollOutcome::Cancelled { attempts });
            }
        }

        attempts += 1;
        current = match api.get_prediction(&current.id).await {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!(prediction_id = %current.id, attempt = attempts, error = %e, "poll: status fetch failed");
                return Err(e);
            }
        };
        debug!(prediction_id = %current.id, attempt = attempts, status = ?current.status, "poll: status fetched");
    }
}

/// `canceled` on the provider side counts as failed.
fn terminal_outcome(prediction: &Prediction) -> Option<PollOutcome> {
    if !prediction.status.is_terminal() {
        return None;
    }
    Some(if prediction.status == PredictionStatus::Succeeded {
        PollOutcome::Succeeded(prediction.clone())
    } else {
        PollOutcome::Failed(prediction.clone())
    })
}

#[cfg(test)]
#[path = "poll_test.rs"]
mod tests;
