//! Shopping assistant chat proxy.
//!
//! Forwards a shopper's message to a Gemini-compatible `generateContent`
//! endpoint and returns the model's text reply.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::ChatConfig;

/// Errors that can occur when talking to the chat upstream.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No API key configured.
    #[error("chat API key not set")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Rate limited by the upstream.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Upstream answered without any text.
    #[error("empty reply from model")]
    EmptyReply,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Chat upstream client.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<ChatClientInner>,
}

struct ChatClientInner {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl ChatClient {
    /// Create a chat client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(ChatClientInner {
                client,
                api_key: config.api_key.clone(),
                endpoint: config.endpoint.trim_end_matches('/').to_string(),
                model: config.model.clone(),
                temperature: config.temperature,
            }),
        })
    }

    /// Whether an API key is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.api_key.is_some()
    }

    /// Send one message and return the model's reply.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NotConfigured`] without an API key, or an
    /// upstream error if the request fails.
    #[instrument(skip(self, message), fields(model = %self.inner.model))]
    pub async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let api_key = self.inner.api_key.as_ref().ok_or(ChatError::NotConfigured)?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: message }],
            }],
            generation_config: GenerationConfig {
                temperature: self.inner.temperature,
            },
        };
        let url = format!(
            "{}/models/{}:generateContent",
            self.inner.endpoint, self.inner.model
        );

        let response = self
            .inner
            .client
            .post(url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Parse(format!("Failed to parse response: {e}")))?;
        parsed.into_text().ok_or(ChatError::EmptyReply)
    }
}

async fn handle_error_status(status: StatusCode, response: reqwest::Response) -> ChatError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return ChatError::RateLimited(retry_after);
    }

    match response.text().await {
        Ok(body) => {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or(body, |api_error| api_error.error.message);
            ChatError::Api {
                status: status.as_u16(),
                message,
            }
        }
        Err(e) => ChatError::Http(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, http::HeaderMap, routing::post};
    use serde_json::{Value, json};

    use super::*;

    fn config(endpoint: &str, key: Option<&str>) -> ChatConfig {
        ChatConfig {
            api_key: key.map(SecretString::from),
            endpoint: endpoint.to_string(),
            ..ChatConfig::default()
        }
    }

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_request_wire_format() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "any rice?" }],
            }],
            generation_config: GenerationConfig { temperature: 0.5 },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "any rice?"}]}],
                "generationConfig": {"temperature": 0.5}
            })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Try "},{"text":"basmati."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("Try basmati."));
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[tokio::test]
    async fn test_reply_without_key() {
        let client = ChatClient::new(&config("http://127.0.0.1:9", None)).unwrap();
        assert!(!client.is_configured());
        assert!(matches!(
            client.reply("hello").await,
            Err(ChatError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_reply_round_trip() {
        let router = Router::new().route(
            "/models/{model}",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let text = body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": format!("{key}:{text}")}]}}]
                }))
            }),
        );
        let endpoint = spawn_upstream(router).await;

        let client = ChatClient::new(&config(&endpoint, Some("k3y"))).unwrap();
        let reply = client.reply("milk?").await.unwrap();
        assert_eq!(reply, "k3y:milk?");
    }

    #[tokio::test]
    async fn test_reply_maps_api_error() {
        let router = Router::new().route(
            "/models/{model}",
            post(|| async {
                (
                    axum::http::StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": {"code": 400, "message": "bad model", "status": "INVALID_ARGUMENT"}
                    })),
                )
            }),
        );
        let endpoint = spawn_upstream(router).await;

        let client = ChatClient::new(&config(&endpoint, Some("k3y"))).unwrap();
        let err = client.reply("hi").await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Api { status: 400, ref message } if message == "bad model"
        ));
    }

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::NotConfigured.to_string(), "chat API key not set");
        assert_eq!(
            ChatError::RateLimited(30).to_string(),
            "rate limited, retry after 30 seconds"
        );
    }
}
