//! Telemetry metric name constants.
//!
//! Centralised metric names for multiroute operations. The daemon or an
//! embedding application installs its own `metrics` recorder (e.g.
//! prometheus); without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `multiroute_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation`: analysis task (e.g. "classify", "sentiment")
//! - `status`: outcome: "ok" or "error"
//! - `model`: backend model the task was routed to

/// Total analysis requests dispatched to the backend.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "multiroute_requests_total";

/// Dispatch duration in seconds, backend call included.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "multiroute_request_duration_seconds";

/// Total chat calls made to the Ollama backend.
///
/// Labels: `model`, `status` ("ok" | "error").
pub const BACKEND_CALLS_TOTAL: &str = "multiroute_backend_calls_total";
