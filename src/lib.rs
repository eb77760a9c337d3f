//! llm-multiroute - text analysis API with per-task model routing
//!
//! Four analysis operations (classification, sentiment analysis,
//! summarization and intent detection) share one request shape and each
//! return a fixed result shape. Inference is delegated to an
//! [`InferenceBackend`]; the bundled [`OllamaClient`] sends every task to the
//! model its [`ModelRoutes`] entry names.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use llm_multiroute::{Dispatcher, ModelRoutes, OllamaClient, TaskType};
//!
//! #[tokio::main]
//! async fn main() -> llm_multiroute::Result<()> {
//!     let backend = OllamaClient::builder("http://localhost:11434")
//!         .routes(ModelRoutes::new().route(TaskType::Sentiment, "llama3.2:3b"))
//!         .build()?;
//!     let dispatcher = Dispatcher::new(Arc::new(backend));
//!
//!     let sentiment = dispatcher
//!         .analyze_sentiment(Some("I love this product! It's amazing!"))
//!         .await?;
//!
//!     println!("{} ({})", sentiment.overall_sentiment, sentiment.sentiment_score);
//!     Ok(())
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod providers;
pub mod routing;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod traits;
pub mod types;
mod version;

// Re-export main types at crate root
pub use dispatcher::Dispatcher;
pub use error::{MultirouteError, Result};
pub use routing::ModelRoutes;
pub use traits::InferenceBackend;
pub use version::{PKG_VERSION, version_string};

#[cfg(feature = "ollama")]
pub use providers::OllamaClient;

// Re-export all types
pub use types::{
    Analysis, ClassificationResult, IntentResult, ParseError, RawOutput, SentimentResult,
    SummaryResult, TaskType, TextRequest,
};
