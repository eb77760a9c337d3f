//! Ollama chat client used as the inference backend.
//!
//! Each task is sent as a single non-streaming `/api/chat` call to the model
//! the [`ModelRoutes`] table assigns to it. The model is instructed to answer
//! with a bare JSON object; a surrounding Markdown code fence is tolerated.
//! See: <https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::routing::ModelRoutes;
use crate::telemetry;
use crate::traits::InferenceBackend;
use crate::{MultirouteError, RawOutput, Result, TaskType};

/// Default base URL for a local Ollama daemon.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default HTTP timeout; local models can be slow to load.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the Ollama chat API.
#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
    routes: ModelRoutes,
}

impl OllamaClient {
    /// Start configuring a client for the given base URL.
    pub fn builder(base_url: impl Into<String>) -> OllamaClientBuilder {
        OllamaClientBuilder::new(base_url)
    }

    /// Client with default settings (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// The routing table this client uses.
    pub fn routes(&self) -> &ModelRoutes {
        &self.routes
    }

    /// Send one chat message and return the assistant's reply text.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn chat(&self, prompt: &str, model: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let mut request = self.http.post(&url).json(&ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let result = self.send(request, model).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::BACKEND_CALLS_TOTAL,
            "model" => model.to_owned(),
            "status" => status,
        )
        .increment(1);
        result
    }

    async fn send(&self, request: reqwest::RequestBuilder, model: &str) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| MultirouteError::Http(e.to_string()))?;

        let response = check_status(response, model).await?;

        let text = response
            .text()
            .await
            .map_err(|e| MultirouteError::Http(e.to_string()))?;
        let body: ChatResponse = serde_json::from_str(&text)?;

        body.message
            .map(|m| m.content)
            .ok_or(MultirouteError::EmptyResponse)
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn invoke(&self, task: TaskType, text: Option<&str>) -> Result<RawOutput> {
        let model = self.routes.model(task);
        debug!(%task, model, "routing task to model");
        let reply = self.chat(&build_prompt(task, text), model).await?;
        parse_reply(&reply)
    }
}

/// Builder for [`OllamaClient`].
pub struct OllamaClientBuilder {
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
    timeout: Duration,
    routes: ModelRoutes,
}

impl OllamaClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            routes: ModelRoutes::default(),
        }
    }

    /// Send `Authorization: Bearer <key>` (hosted Ollama). Empty keys are ignored.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.is_empty()).then_some(key);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Whole-request HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn routes(mut self, routes: ModelRoutes) -> Self {
        self.routes = routes;
        self
    }

    pub fn build(self) -> Result<OllamaClient> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                MultirouteError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(OllamaClient {
            http,
            base_url: self.base_url,
            api_key: self.api_key,
            temperature: self.temperature,
            routes: self.routes,
        })
    }
}

/// Instruction plus the expected JSON shape for each task.
fn build_prompt(task: TaskType, text: Option<&str>) -> String {
    let (instruction, shape) = match task {
        TaskType::Classify => (
            "Classify the following text with suitable labels and a primary category.",
            r#"{"labels": ["label1", "label2"], "primaryCategory": "category", "confidence": 0.9}"#,
        ),
        TaskType::Sentiment => (
            "Analyze the sentiment of the following text.",
            r#"{"overallSentiment": "positive", "sentimentScore": 0.8, "emotions": ["joy", "excitement"], "confidence": 0.9}"#,
        ),
        TaskType::Summarize => (
            "Summarize the following text concisely.",
            r#"{"summary": "your summary here", "keyPoints": ["point1", "point2", "point3"], "wordCount": 25}"#,
        ),
        TaskType::Intent => (
            "Detect the intent behind the following text.",
            r#"{"primaryIntent": "main_intent", "secondaryIntents": ["intent1", "intent2"], "intentCategory": "question", "confidence": 0.9}"#,
        ),
    };
    format!(
        "{instruction} Respond with ONLY valid JSON, no additional text or explanation.\n\n\
         Text: {}\n\n\
         Return JSON in this exact format:\n{shape}",
        text.unwrap_or_default()
    )
}

/// Decode the model's reply into a raw output object.
pub fn parse_reply(reply: &str) -> Result<RawOutput> {
    serde_json::from_str::<serde_json::Value>(strip_code_fence(reply))
        .map_err(|_| {
            MultirouteError::MalformedOutput(format!(
                "Failed to parse AI response as JSON: {reply}"
            ))
        })
        .and_then(RawOutput::from_value)
}

/// Remove a Markdown code fence (```` ```json ```` or bare ```` ``` ````)
/// wrapped around the reply.
pub fn strip_code_fence(reply: &str) -> &str {
    let mut s = reply.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Map non-success statuses to typed errors, preferring Ollama's own
/// `{"error": "..."}` message.
async fn check_status(response: Response, model: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs);

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Ollama API error: {status}"));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(MultirouteError::AuthenticationFailed)
        }
        StatusCode::NOT_FOUND => Err(MultirouteError::ModelNotFound(model.to_string())),
        StatusCode::TOO_MANY_REQUESTS => Err(MultirouteError::RateLimited { retry_after }),
        _ => Err(MultirouteError::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let reply = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(reply), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        let reply = "  ```\n{\"a\": 1}\n```  ";
        assert_eq!(strip_code_fence(reply), "{\"a\": 1}");
    }

    #[test]
    fn leaves_unfenced_reply_alone() {
        assert_eq!(strip_code_fence(" {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn prompt_embeds_text_and_shape() {
        let prompt = build_prompt(TaskType::Intent, Some("Where can I eat?"));
        assert!(prompt.contains("Text: Where can I eat?"));
        assert!(prompt.contains("\"intentCategory\""));
    }

    #[test]
    fn prompt_with_no_text_is_still_built() {
        let prompt = build_prompt(TaskType::Summarize, None);
        assert!(prompt.contains("Text: \n"));
    }

    #[test]
    fn unparseable_reply_keeps_raw_text() {
        let err = parse_reply("This is not valid JSON").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse AI response as JSON: This is not valid JSON"
        );
    }
}
