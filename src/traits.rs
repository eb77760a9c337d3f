//! Core InferenceBackend trait

use async_trait::async_trait;

use crate::{RawOutput, Result, TaskType};

/// The inference collaborator the dispatcher delegates to.
///
/// One call per analysis request: the backend receives the task selector and
/// the request text exactly as the caller supplied it (`None` included) and
/// returns the raw JSON object it produced. Implementations own their
/// timeouts; the dispatcher adds none.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Run a single analysis task.
    async fn invoke(&self, task: TaskType, text: Option<&str>) -> Result<RawOutput>;
}
