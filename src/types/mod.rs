//! Public types for the multiroute API.

mod analysis;
mod raw;
mod request;
mod task;

pub use analysis::{Analysis, ClassificationResult, IntentResult, SentimentResult, SummaryResult};
pub use raw::{RawOutput, UNKNOWN};
pub use request::{ParseError, TextRequest};
pub use task::TaskType;
