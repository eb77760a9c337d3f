//! Inbound request contract

use serde::{Deserialize, Serialize};

/// Structural validation failures for an inbound request.
///
/// These are the only two ways a request can be rejected before reaching
/// the dispatcher; there is no semantic validation of the text itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The body is not a JSON object of the `TextRequest` shape.
    #[error("malformed request body: {0}")]
    Malformed(String),

    /// The declared content type is not JSON.
    #[error("unsupported media type: expected application/json, got {0}")]
    UnsupportedMedia(String),
}

/// Request body shared by all analysis endpoints.
///
/// `text` is passed through verbatim: an absent or `null` field is carried
/// as `None` rather than being rejected or replaced with a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl TextRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Validate and decode a raw request body.
    ///
    /// The content type is checked first, so a non-JSON body sent with a
    /// non-JSON content type reports `UnsupportedMedia`.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, ParseError> {
        match content_type {
            Some(ct) if is_json_content_type(ct) => {}
            Some(ct) => return Err(ParseError::UnsupportedMedia(ct.to_string())),
            None => return Err(ParseError::UnsupportedMedia("no content type".to_string())),
        }

        // Going through `Value` first keeps "not an object" distinct from
        // "object with a bad field" in the error message.
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| ParseError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(ParseError::Malformed(
                "expected a JSON object with a `text` field".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ParseError::Malformed(e.to_string()))
    }

    /// Borrow the text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Accepts `application/json` and `application/<suffix>+json`, ignoring
/// parameters such as `charset`.
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parameters_are_ignored() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/vnd.api+json"));
        assert!(!is_json_content_type("text/plain"));
        assert!(!is_json_content_type("text/json"));
        assert!(!is_json_content_type(""));
    }
}
