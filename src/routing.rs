//! Per-task model routing.
//!
//! Each analysis task is served by its own model. The router is a plain
//! lookup table, filled from the `[routing]` config section:
//!
//! ```toml
//! [routing]
//! classify = "gemma3:4b"
//! summarize = "ministral-3:8b"
//! ```
//!
//! Unset tasks keep their default model.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::TaskType;

/// Default model for classification.
pub const DEFAULT_CLASSIFY_MODEL: &str = "gemma3:4b";
/// Default model for sentiment analysis.
pub const DEFAULT_SENTIMENT_MODEL: &str = "ministral-3:3b";
/// Default model for summarization.
pub const DEFAULT_SUMMARIZE_MODEL: &str = "ministral-3:8b";
/// Default model for intent detection.
pub const DEFAULT_INTENT_MODEL: &str = "gemma3:12b";

/// Model assignment for every task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelRoutes {
    #[serde(default = "default_classify")]
    pub classify: String,
    #[serde(default = "default_sentiment")]
    pub sentiment: String,
    #[serde(default = "default_summarize")]
    pub summarize: String,
    #[serde(default = "default_intent")]
    pub intent: String,
}

impl Default for ModelRoutes {
    fn default() -> Self {
        Self {
            classify: default_classify(),
            sentiment: default_sentiment(),
            summarize: default_summarize(),
            intent: default_intent(),
        }
    }
}

fn default_classify() -> String {
    DEFAULT_CLASSIFY_MODEL.to_string()
}

fn default_sentiment() -> String {
    DEFAULT_SENTIMENT_MODEL.to_string()
}

fn default_summarize() -> String {
    DEFAULT_SUMMARIZE_MODEL.to_string()
}

fn default_intent() -> String {
    DEFAULT_INTENT_MODEL.to_string()
}

impl ModelRoutes {
    /// Create a routing table with the default models.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a model to a task.
    pub fn route(mut self, task: TaskType, model: impl Into<String>) -> Self {
        self.set_model(task, model);
        self
    }

    /// Replace the model serving a task.
    pub fn set_model(&mut self, task: TaskType, model: impl Into<String>) {
        *self.slot_mut(task) = model.into();
    }

    /// Model serving the given task.
    pub fn model(&self, task: TaskType) -> &str {
        match task {
            TaskType::Classify => &self.classify,
            TaskType::Sentiment => &self.sentiment,
            TaskType::Summarize => &self.summarize,
            TaskType::Intent => &self.intent,
        }
    }

    /// The full table keyed by task wire name.
    pub fn routes(&self) -> BTreeMap<String, String> {
        TaskType::ALL
            .into_iter()
            .map(|task| (task.as_str().to_string(), self.model(task).to_string()))
            .collect()
    }

    fn slot_mut(&mut self, task: TaskType) -> &mut String {
        match task {
            TaskType::Classify => &mut self.classify,
            TaskType::Sentiment => &mut self.sentiment,
            TaskType::Summarize => &mut self.summarize,
            TaskType::Intent => &mut self.intent,
        }
    }
}
