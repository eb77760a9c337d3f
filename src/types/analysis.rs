//! Analysis result shapes and their adaptation from raw backend output

use serde::{Deserialize, Serialize};

use super::raw::{RawOutput, UNKNOWN};
use super::task::TaskType;
use crate::Result;

/// A fixed result shape produced by one analysis task.
///
/// `TASK` keys the dispatcher's call to the backend; `from_raw` adapts the
/// backend's output into the shape, filling fallbacks for absent fields.
pub trait Analysis: Sized + Send + 'static {
    const TASK: TaskType;

    fn from_raw(raw: RawOutput) -> Result<Self>;
}

/// Labels and primary category assigned to a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub labels: Vec<String>,
    pub primary_category: String,
    pub confidence: f64,
}

impl Analysis for ClassificationResult {
    const TASK: TaskType = TaskType::Classify;

    fn from_raw(raw: RawOutput) -> Result<Self> {
        Ok(Self {
            labels: raw.string_list("labels")?,
            primary_category: raw.label("primaryCategory", UNKNOWN)?,
            confidence: raw.number("confidence")?,
        })
    }
}

/// Overall polarity, signed score and detected emotions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub overall_sentiment: String,
    pub sentiment_score: f64,
    pub emotions: Vec<String>,
    pub confidence: f64,
}

impl SentimentResult {
    /// Polarity reported when the backend gives none.
    pub const NEUTRAL: &'static str = "neutral";
}

impl Analysis for SentimentResult {
    const TASK: TaskType = TaskType::Sentiment;

    fn from_raw(raw: RawOutput) -> Result<Self> {
        Ok(Self {
            overall_sentiment: raw.label("overallSentiment", Self::NEUTRAL)?,
            sentiment_score: raw.number("sentimentScore")?,
            emotions: raw.string_list("emotions")?,
            confidence: raw.number("confidence")?,
        })
    }
}

/// Condensed text with its key points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub word_count: u64,
}

impl Analysis for SummaryResult {
    const TASK: TaskType = TaskType::Summarize;

    fn from_raw(raw: RawOutput) -> Result<Self> {
        let summary = raw.string("summary")?.unwrap_or_default();
        // wordCount describes the summary, so count it ourselves if missing.
        let word_count = match raw.count("wordCount")? {
            Some(n) => n,
            None => summary.split_whitespace().count() as u64,
        };
        Ok(Self {
            key_points: raw.string_list("keyPoints")?,
            summary,
            word_count,
        })
    }
}

/// Primary and secondary intents behind a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    pub primary_intent: String,
    pub secondary_intents: Vec<String>,
    /// Usually one of `question`, `command`, `request`, `statement`, but
    /// backends may report others.
    pub intent_category: String,
    pub confidence: f64,
}

impl Analysis for IntentResult {
    const TASK: TaskType = TaskType::Intent;

    fn from_raw(raw: RawOutput) -> Result<Self> {
        Ok(Self {
            primary_intent: raw.label("primaryIntent", UNKNOWN)?,
            secondary_intents: raw.string_list("secondaryIntents")?,
            intent_category: raw.label("intentCategory", UNKNOWN)?,
            confidence: raw.number("confidence")?,
        })
    }
}
