//! Runtime-independent core of the AI proxy function.
//!
//! Takes an API-gateway style event (`httpMethod`, `body`) and always
//! produces a response: failures become JSON `{"error": ...}` bodies with a
//! status code, never a panic or an `Err` to the runtime.

use crate::config::proxy::ProxyConfig;
use crate::domain::ports::CredentialProvider;
use crate::proxy::upstream::UpstreamClient;
use crate::utils::error::{ArchitectError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const UPSTREAM_FALLBACK_ERROR: &str = "OpenAI API error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl ProxyEvent {
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            body: Some(body.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    fn error(status_code: u16, message: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body: json!({ "error": message }).to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Parsed body; `Value::Null` when the body is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Deserialize)]
struct ProxyRequest {
    prompt: String,
    #[serde(rename = "systemPrompt")]
    system_prompt: String,
}

pub struct ProxyHandler<C: CredentialProvider> {
    config: ProxyConfig,
    credentials: C,
    upstream: UpstreamClient,
}

impl<C: CredentialProvider> ProxyHandler<C> {
    pub fn new(config: ProxyConfig, credentials: C) -> Result<Self> {
        let upstream = UpstreamClient::new(&config)?;
        Ok(Self {
            config,
            credentials,
            upstream,
        })
    }

    pub fn missing_key_message(&self) -> String {
        format!(
            "OpenAI API key not configured on server. Please add {} to the server environment variables.",
            self.config.api_key_env
        )
    }

    pub async fn handle(&self, event: &ProxyEvent) -> ProxyResponse {
        if event.http_method != "POST" {
            tracing::warn!("Rejected {} request", event.http_method);
            return ProxyResponse::error(405, METHOD_NOT_ALLOWED);
        }

        match self.forward(event).await {
            Ok(response) if response.is_success() => {
                tracing::info!("Proxy request finished with status {}", response.status_code);
                response
            }
            Ok(response) => {
                tracing::warn!("Proxy request failed with status {}", response.status_code);
                response
            }
            Err(e) => {
                tracing::error!("OpenAI proxy error: {}", e);
                ProxyResponse::error(500, &format!("Server error: {}", e))
            }
        }
    }

    async fn forward(&self, event: &ProxyEvent) -> Result<ProxyResponse> {
        let request: ProxyRequest = serde_json::from_str(event.body.as_deref().unwrap_or_default())?;

        let Some(api_key) = self.credentials.api_key() else {
            let missing = ArchitectError::MissingCredential {
                message: self.missing_key_message(),
            };
            tracing::error!("{}; refusing to call upstream", missing);
            return Ok(ProxyResponse::error(500, &missing.user_friendly_message()));
        };

        let reply = self
            .upstream
            .chat(&api_key, &request.prompt, &request.system_prompt)
            .await?;

        if !reply.status.is_success() {
            let data: Value = serde_json::from_str(&reply.body).unwrap_or(Value::Null);
            let message = data["error"]["message"]
                .as_str()
                .unwrap_or(UPSTREAM_FALLBACK_ERROR);
            tracing::warn!("Upstream rejected request ({}): {}", reply.status, message);
            return Ok(ProxyResponse::error(reply.status.as_u16(), message));
        }

        let data: Value = serde_json::from_str(&reply.body)?;

        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            self.config.allowed_origin.clone(),
        );

        Ok(ProxyResponse {
            status_code: 200,
            headers,
            body: data.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::credentials::StaticCredentials;

    fn handler(credentials: StaticCredentials) -> ProxyHandler<StaticCredentials> {
        let config = ProxyConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            ..ProxyConfig::default()
        };
        ProxyHandler::new(config, credentials).unwrap()
    }

    #[tokio::test]
    async fn test_get_is_rejected() {
        let handler = handler(StaticCredentials::new("sk-test"));
        let event = ProxyEvent {
            http_method: "GET".to_string(),
            body: None,
        };

        let response = handler.handle(&event).await;
        assert_eq!(response.status_code, 405);
        assert_eq!(response.json()["error"], "Method not allowed");
        assert!(!response.is_success());

        // Methods are case-sensitive, a lowercase post is not a POST.
        let lowercase = ProxyEvent {
            http_method: "post".to_string(),
            body: Some(r#"{"prompt":"hi","systemPrompt":"be brief"}"#.to_string()),
        };
        assert_eq!(handler.handle(&lowercase).await.status_code, 405);
    }

    #[tokio::test]
    async fn test_missing_key_is_reported() {
        let handler = handler(StaticCredentials::missing());
        let event = ProxyEvent::post(r#"{"prompt":"hi","systemPrompt":"be brief"}"#);

        let response = handler.handle(&event).await;
        assert_eq!(response.status_code, 500);
        let error = response.json()["error"].as_str().unwrap().to_string();
        assert!(error.contains("OPENAI_API_KEY"));
        assert!(error.contains("not configured"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_server_error() {
        let handler = handler(StaticCredentials::new("sk-test"));

        let response = handler.handle(&ProxyEvent::post("{not json")).await;
        assert_eq!(response.status_code, 500);
        assert!(response.json()["error"]
            .as_str()
            .unwrap()
            .starts_with("Server error: "));

        let missing_body = ProxyEvent {
            http_method: "POST".to_string(),
            body: None,
        };
        assert_eq!(handler.handle(&missing_body).await.status_code, 500);
    }

    #[test]
    fn test_event_wire_format() {
        let event: ProxyEvent =
            serde_json::from_str(r#"{"httpMethod":"POST","body":"{}","path":"/x"}"#).unwrap();
        assert_eq!(event.http_method, "POST");

        let response = ProxyResponse::error(405, METHOD_NOT_ALLOWED);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 405);
        assert_eq!(json["body"], r#"{"error":"Method not allowed"}"#);
    }
}
