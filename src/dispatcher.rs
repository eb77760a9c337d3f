//! Routes analysis requests to the backend and adapts its output.
//!
//! Every operation follows the same three steps:
//!
//! ```text
//! text ──► backend.invoke(R::TASK, text) ──► R::from_raw(raw) ──► R
//! ```
//!
//! The four public operations are thin wrappers over [`Dispatcher::dispatch`],
//! keyed on the result type's [`Analysis::TASK`]. Backend failures are
//! returned unchanged: no retry, no fallback result.

use std::sync::Arc;
use std::time::Instant;

use tracing::{instrument, warn};

use crate::telemetry;
use crate::traits::InferenceBackend;
use crate::types::{
    Analysis, ClassificationResult, IntentResult, SentimentResult, SummaryResult, TaskType,
};
use crate::Result;

/// Stateless front for the four analysis operations.
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn InferenceBackend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Name of the backend requests are forwarded to.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Classify text into labels and a primary category.
    pub async fn classify(&self, text: Option<&str>) -> Result<ClassificationResult> {
        self.dispatch(text).await
    }

    /// Detect overall sentiment and emotions.
    pub async fn analyze_sentiment(&self, text: Option<&str>) -> Result<SentimentResult> {
        self.dispatch(text).await
    }

    /// Summarize text into a summary and key points.
    pub async fn summarize(&self, text: Option<&str>) -> Result<SummaryResult> {
        self.dispatch(text).await
    }

    /// Detect primary and secondary intents.
    pub async fn detect_intent(&self, text: Option<&str>) -> Result<IntentResult> {
        self.dispatch(text).await
    }

    /// Run the task for result type `R`.
    #[instrument(
        skip(self, text),
        fields(
            operation = %R::TASK,
            backend = self.backend.name(),
            text_len = text.map(str::len),
        )
    )]
    pub async fn dispatch<R: Analysis>(&self, text: Option<&str>) -> Result<R> {
        let start = Instant::now();
        let result = self
            .backend
            .invoke(R::TASK, text)
            .await
            .and_then(R::from_raw);
        match &result {
            Ok(_) => Self::record_request(R::TASK, start, true),
            Err(e) => {
                warn!(error = %e, "analysis failed");
                Self::record_request(R::TASK, start, false);
            }
        }
        result
    }

    /// Record request outcome metrics (counter + histogram).
    fn record_request(task: TaskType, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        let elapsed = start.elapsed().as_secs_f64();
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "operation" => task.as_str(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "operation" => task.as_str(),
        )
        .record(elapsed);
    }
}
