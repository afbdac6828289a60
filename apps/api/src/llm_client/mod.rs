//! LLM Client: the single point of entry for chat-completion calls.
//!
//! ARCHITECTURAL RULE: the inference credential never leaves this process.
//! The browser page talks to our own API; only this module talks to the provider.
//!
//! Model: mistralai/mistral-small-creative (hardcoded, one model for every analysis)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
pub mod scripted;

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// The model used for every analysis.
pub const MODEL: &str = "mistralai/mistral-small-creative";
/// Shown when the provider's error body has no readable message.
const FALLBACK_ERROR_MESSAGE: &str = "Check API Key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API Error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned no completion content")]
    EmptyContent,
}

/// Anything that can turn a prompt into completion text.
/// `AppState` carries an `Arc<dyn InferenceClient>` so tests can script replies.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Chat-completion client for OpenRouter's OpenAI-compatible endpoint.
/// One request per call: no retries, no timeout, no streaming.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(endpoint: String, api_key: String, referer: String, title: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            referer,
            title,
        }
    }
}

#[async_trait]
impl InferenceClient for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let body = response.text().await?;
        let envelope: ChatCompletionResponse = serde_json::from_str(&body)?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded: completion_chars={}", content.len());

        Ok(content)
    }
}

/// Best-effort extraction of `error.message` from a provider error body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct Stub {
        status: StatusCode,
        body: &'static str,
        seen: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
    }

    async fn stub_handler(
        State(stub): State<Stub>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        stub.seen.lock().unwrap().push((headers, body));
        (stub.status, stub.body.to_string())
    }

    async fn spawn_stub(stub: Stub) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/v1/chat/completions", post(stub_handler))
            .with_state(stub);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/chat/completions")
    }

    fn client(endpoint: String) -> OpenRouterClient {
        OpenRouterClient::new(
            endpoint,
            "sk-test".to_string(),
            "http://localhost:8080".to_string(),
            "ATS Analyzer".to_string(),
        )
    }

    fn stub(status: StatusCode, body: &'static str) -> Stub {
        Stub {
            status,
            body,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[tokio::test]
    async fn test_returns_first_choice_content_unmodified() {
        let stub = stub(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"```json\n{\"score\": 70}\n```"}},{"message":{"content":"ignored"}}]}"#,
        );
        let seen = stub.seen.clone();
        let endpoint = spawn_stub(stub).await;

        let content = client(endpoint).complete("compare these").await.unwrap();
        assert_eq!(content, "```json\n{\"score\": 70}\n```");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (headers, body) = &seen[0];
        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert_eq!(headers["x-title"], "ATS Analyzer");
        assert_eq!(headers["http-referer"], "http://localhost:8080");
        assert_eq!(body["model"], MODEL);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "compare these");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_uses_provider_message() {
        let endpoint = spawn_stub(stub(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"User not found."}}"#,
        ))
        .await;

        let err = client(endpoint).complete("p").await.unwrap_err();
        assert_eq!(err.to_string(), "API Error 401: User not found.");
    }

    #[tokio::test]
    async fn test_error_status_with_unparseable_body_uses_fallback() {
        let endpoint = spawn_stub(stub(StatusCode::BAD_GATEWAY, "<html>upstream</html>")).await;

        let err = client(endpoint).complete("p").await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Check API Key");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_content() {
        let endpoint = spawn_stub(stub(StatusCode::OK, r#"{"choices":[]}"#)).await;

        let err = client(endpoint).complete("p").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}/v1/chat/completions"))
            .complete("p")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }

    #[test]
    fn test_api_error_message_ignores_empty_message() {
        assert_eq!(api_error_message(r#"{"error":{"message":""}}"#), "Check API Key");
        assert_eq!(api_error_message(r#"{}"#), "Check API Key");
    }
}
