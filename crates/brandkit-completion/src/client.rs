use crate::config::CompletionConfig;
use brandkit_core::ClientError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

/// The remote chat-completion call as a Tower service from prompt to reply.
///
/// Failure mapping:
///
/// - HTTP 429, or an error body whose code or type is `insufficient_quota`:
///   [`ClientError::QuotaExceeded`]
/// - transport failures: [`ClientError::Transient`]
/// - any other non-2xx status: [`ClientError::RemoteRejected`]
/// - a 2xx body without message content: [`ClientError::Unknown`]
#[derive(Debug, Clone)]
pub struct ChatCompletions {
    client: reqwest::Client,
    config: Arc<CompletionConfig>,
}

impl ChatCompletions {
    pub fn new(config: CompletionConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: CompletionConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Deserialize, Default)]
struct ApiError {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<serde_json::Value>,
}

impl Service<String> for ChatCompletions {
    type Response = String;
    type Error = ClientError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, prompt: String) -> Self::Future {
        let client = self.client.clone();
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let body = ChatRequest {
                model: &config.model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: &config.system_prompt,
                    },
                    ChatMessage {
                        role: "user",
                        content: &prompt,
                    },
                ],
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            };

            tracing::debug!(model = %config.model, "requesting completion");
            let response = client
                .post(config.endpoint())
                .bearer_auth(&config.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| ClientError::Transient(e.to_string()))?;

            let status = response.status().as_u16();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ClientError::Transient(e.to_string()))?;

            if !(200..300).contains(&status) {
                return Err(map_status(status, &bytes));
            }

            let reply: ChatResponse = serde_json::from_slice(&bytes)
                .map_err(|e| ClientError::Unknown(format!("malformed completion response: {e}")))?;
            reply
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content)
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| ClientError::Unknown("completion response has no content".to_string()))
        })
    }
}

fn map_status(status: u16, body: &[u8]) -> ClientError {
    let error = serde_json::from_slice::<ErrorEnvelope>(body)
        .unwrap_or_default()
        .error
        .unwrap_or_default();

    let code = error.code.as_ref().and_then(|c| match c {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    });
    let message = error
        .message
        .unwrap_or_else(|| format!("completion API returned HTTP {status}"));

    let out_of_quota = code.as_deref() == Some("insufficient_quota")
        || error.kind.as_deref() == Some("insufficient_quota");
    if status == 429 || out_of_quota {
        return ClientError::QuotaExceeded(message);
    }

    ClientError::RemoteRejected {
        status,
        code,
        message,
        details: error.kind,
    }
}
