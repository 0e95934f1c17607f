//! Claude bridge: one stateless call to the Anthropic Messages API.
//!
//! The gateway holds the key; the frontend never sees it. The bridge only
//! transports text — prompt in, raw completion out. Parsing the completion
//! into the three diary fields lives here too so the handler can map each
//! failure to its own error kind.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The three message fields the model must return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryMessages {
    pub deep_message: String,
    pub inner_message: String,
    pub action_advice: String,
}

/// Example texts for the three journal input fields, each carrying the
/// `例:` prefix the UI expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPlaceholders {
    pub mood: String,
    pub event: String,
    pub intuition: String,
}

impl EntryPlaceholders {
    /// The fixed fallback set, served whenever the model cannot answer.
    pub fn defaults() -> Self {
        Self {
            mood: "例: 穏やかで少し眠い".to_string(),
            event: "例: 朝のコーヒーが美味しくて気分が上がった".to_string(),
            intuition: "例: 今日は大切な人との繋がりを感じる日".to_string(),
        }
    }

    fn with_example_prefix(mut self) -> Self {
        for field in [&mut self.mood, &mut self.event, &mut self.intuition] {
            if !field.starts_with("例:") {
                *field = format!("例: {field}");
            }
        }
        self
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Claude request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success status from the API, with the raw error body.
    #[error("Claude API error {status}")]
    Api { status: u16, body: String },
    /// 2xx answer whose body was not the expected messages shape.
    #[error("Claude response shape unexpected: {0}")]
    Shape(String),
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Stateless Anthropic Messages client.
pub struct ClaudeBridge {
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
    client: reqwest::Client,
}

impl ClaudeBridge {
    /// Create a bridge from `ANTHROPIC_API_KEY` (legacy alias:
    /// `CLAUDE_API_KEY`). Returns `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .or_else(|_| std::env::var("CLAUDE_API_KEY"))
            .ok()?;
        let key = api_key.trim().to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key))
    }

    /// Create a bridge with an explicit API key.
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1000,
            base_url: ANTHROPIC_API_URL.to_string(),
            client,
        }
    }

    /// Point the bridge at a different messages endpoint.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(Duration::from_secs(secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        self
    }

    /// Send one user-turn prompt and return the raw completion text.
    pub async fn complete(&self, prompt: &str) -> Result<String, BridgeError> {
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let res = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(BridgeError::Api { status, body });
        }

        let parsed: MessagesResponse = res
            .json()
            .await
            .map_err(|e| BridgeError::Shape(e.to_string()))?;

        parsed
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| BridgeError::Shape("empty content array".to_string()))
    }
}

/// Strips markdown code fences and parses the completion as the three diary
/// fields. `None` means the caller should report an upstream parse error with
/// the raw text attached.
pub fn parse_diary_messages(raw: &str) -> Option<DiaryMessages> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    serde_json::from_str(cleaned.trim()).ok()
}

/// Parses the completion as placeholder texts, normalizing the `例:` prefix.
/// `None` means the caller should serve [`EntryPlaceholders::defaults`].
pub fn parse_placeholders(raw: &str) -> Option<EntryPlaceholders> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    serde_json::from_str::<EntryPlaceholders>(cleaned.trim())
        .ok()
        .map(EntryPlaceholders::with_example_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"{"deepMessage":"a","innerMessage":"b","actionAdvice":"c"}"#;
        let parsed = parse_diary_messages(raw).unwrap();
        assert_eq!(parsed.deep_message, "a");
        assert_eq!(parsed.action_advice, "c");
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let raw = "```json\n{\"deepMessage\":\"a\",\"innerMessage\":\"b\",\"actionAdvice\":\"c\"}\n```";
        assert!(parse_diary_messages(raw).is_some());
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(parse_diary_messages(r#"{"deepMessage":"a"}"#).is_none());
        assert!(parse_diary_messages("not json at all").is_none());
    }

    #[test]
    fn test_placeholders_gain_the_example_prefix() {
        let raw = r#"{"mood":"眠い","event":"例: 散歩した","intuition":"良い日になりそう"}"#;
        let parsed = parse_placeholders(raw).unwrap();
        assert_eq!(parsed.mood, "例: 眠い");
        assert_eq!(parsed.event, "例: 散歩した");
        assert_eq!(parsed.intuition, "例: 良い日になりそう");
    }

    #[test]
    fn test_placeholder_parse_failure_yields_none() {
        assert!(parse_placeholders(r#"{"mood":"眠い"}"#).is_none());
        assert!(parse_placeholders("ごめんなさい、生成できません").is_none());
    }

    #[test]
    fn test_default_placeholders_are_prefixed() {
        let defaults = EntryPlaceholders::defaults();
        for field in [&defaults.mood, &defaults.event, &defaults.intuition] {
            assert!(field.starts_with("例:"));
        }
    }

    async fn serve_fixed(
        status: axum::http::StatusCode,
        body: &'static str,
    ) -> std::net::SocketAddr {
        let app = axum::Router::new().route(
            "/v1/messages",
            axum::routing::post(move || async move { (status, body) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_complete_surfaces_upstream_status_and_body() {
        let addr = serve_fixed(
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            r#"{"type":"error","error":{"type":"overloaded_error"}}"#,
        )
        .await;

        let bridge = ClaudeBridge::new("test-key".to_string())
            .with_base_url(&format!("http://{addr}/v1/messages"));
        match bridge.complete("こんにちは").await {
            Err(BridgeError::Api { status, body }) => {
                assert_eq!(status, 503);
                assert!(body.contains("overloaded_error"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_content_block_text() {
        let addr = serve_fixed(
            axum::http::StatusCode::OK,
            r#"{"content":[{"type":"text","text":"{\"deepMessage\":\"a\"}"}]}"#,
        )
        .await;

        let bridge = ClaudeBridge::new("test-key".to_string())
            .with_base_url(&format!("http://{addr}/v1/messages"));
        let text = bridge.complete("こんにちは").await.unwrap();
        assert!(text.contains("deepMessage"));
    }
}
