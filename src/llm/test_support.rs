//! Scripted provider and instant sleeper shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::poll::Sleeper;
use super::types::{GenerationParams, Prediction, PredictionApi, PredictionOutput, PredictionStatus, ProviderError};

pub const TEST_PREDICTION_ID: &str = "pred_test";
pub const TEST_MODEL_LABEL: &str = "Test Granite";

#[must_use]
pub fn prediction(status: PredictionStatus) -> Prediction {
    Prediction { id: TEST_PREDICTION_ID.into(), status, output: None, error: None }
}

#[must_use]
pub fn succeeded(output: PredictionOutput) -> Prediction {
    Prediction { output: Some(output), ..prediction(PredictionStatus::Succeeded) }
}

#[must_use]
pub fn succeeded_text(text: &str) -> Prediction {
    succeeded(PredictionOutput::Text(text.into()))
}

// =========================================================================
// ScriptedApi
// =========================================================================

/// Returns a fixed creation result, then replays `polls` in order. Once the
/// script is exhausted every fetch reports `processing`.
pub struct ScriptedApi {
    create: Mutex<Option<Result<Prediction, ProviderError>>>,
    polls: Mutex<VecDeque<Result<Prediction, ProviderError>>>,
    fetches: AtomicU32,
    prompts: Mutex<Vec<(String, GenerationParams)>>,
}

impl ScriptedApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            create: Mutex::new(Some(Ok(prediction(PredictionStatus::Starting)))),
            polls: Mutex::new(VecDeque::new()),
            fetches: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_create(self, result: Result<Prediction, ProviderError>) -> Self {
        *self.create.lock().unwrap() = Some(result);
        self
    }

    #[must_use]
    pub fn with_polls(self, polls: Vec<Result<Prediction, ProviderError>>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<(String, GenerationParams)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PredictionApi for ScriptedApi {
    async fn create_prediction(&self, prompt: &str, params: &GenerationParams) -> Result<Prediction, ProviderError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), params.clone()));
        self.create
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(prediction(PredictionStatus::Starting)))
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
        assert_eq!(id, TEST_PREDICTION_ID);
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(prediction(PredictionStatus::Processing)))
    }

    fn model_label(&self) -> &str {
        TEST_MODEL_LABEL
    }
}

// =========================================================================
// RecordingSleeper
// =========================================================================

/// Records every requested delay and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}
