use std::time::Duration;

use llm_multiroute::{MultirouteError, Result};

#[test]
fn test_error_display() {
    let err = MultirouteError::ModelNotFound("gemma3:4b".to_string());
    assert!(err.to_string().contains("gemma3:4b"));
}

#[test]
fn test_backend_message_is_verbatim() {
    let err = MultirouteError::backend("AI service unavailable");
    assert_eq!(err.to_string(), "AI service unavailable");
}

#[test]
fn test_malformed_output_message_is_verbatim() {
    let err = MultirouteError::MalformedOutput("Failed to parse AI response as JSON: nope".into());
    assert_eq!(err.to_string(), "Failed to parse AI response as JSON: nope");
}

#[test]
fn test_api_error_display() {
    let err = MultirouteError::Api {
        status: 503,
        message: "unavailable".into(),
    };
    assert_eq!(err.to_string(), "API error (503): unavailable");
}

#[test]
fn test_rate_limited_display() {
    let err = MultirouteError::RateLimited {
        retry_after: Some(Duration::from_secs(2)),
    };
    assert!(err.to_string().contains("rate limited"));
}

#[test]
fn test_json_error_conversion() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{")?)
    }
    assert!(matches!(parse(), Err(MultirouteError::Json(_))));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(MultirouteError::EmptyResponse)
    }
    assert!(returns_error().is_err());
}
