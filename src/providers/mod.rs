//! Inference backend implementations.
//!
//! The dispatcher only sees [`InferenceBackend`](crate::InferenceBackend);
//! this module holds the concrete clients.

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaClient, OllamaClientBuilder};
