//! Analysis task selector

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four analysis operations.
///
/// This is the selector passed to
/// [`InferenceBackend::invoke`](crate::InferenceBackend::invoke) and the key
/// of the model routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Classify,
    Sentiment,
    Summarize,
    Intent,
}

impl TaskType {
    /// All tasks, in routing-table order.
    pub const ALL: [TaskType; 4] = [
        TaskType::Classify,
        TaskType::Sentiment,
        TaskType::Summarize,
        TaskType::Intent,
    ];

    /// Lowercase wire name (`"classify"`, `"sentiment"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Classify => "classify",
            TaskType::Sentiment => "sentiment",
            TaskType::Summarize => "summarize",
            TaskType::Intent => "intent",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskType::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| format!("unknown task type: {s}"))
    }
}
