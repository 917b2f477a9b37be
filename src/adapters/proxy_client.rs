use crate::core::prompts::PromptPair;
use crate::domain::ports::{CompletionBackend, CredentialProvider};
use crate::proxy::handler::{ProxyEvent, ProxyHandler};
use crate::utils::error::{ArchitectError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const CLIENT_FALLBACK_ERROR: &str = "Failed to contact AI service";

/// Read a proxy reply the way the browser client does: the error field on
/// failure, the first choice's message content on success.
pub fn interpret_reply(status: u16, body: &Value) -> Result<String> {
    if !(200..300).contains(&status) {
        let message = body["error"].as_str().unwrap_or(CLIENT_FALLBACK_ERROR);
        return Err(ArchitectError::UpstreamError {
            status,
            message: message.to_string(),
        });
    }

    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ArchitectError::ValidationError {
            message: "response has no choices[0].message.content".to_string(),
        })
}

fn as_display_text(result: Result<String>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("AI request failed: {}", e);
            format!("Error: {}", e.user_friendly_message())
        }
    }
}

/// Talks to a deployed proxy over HTTP.
pub struct ProxyClient {
    client: Client,
    url: String,
}

impl ProxyClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }

    pub async fn try_complete(&self, pair: &PromptPair) -> Result<String> {
        tracing::debug!("Posting prompt to proxy {}", self.url);
        let response = self.client.post(&self.url).json(pair).send().await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if (200..300).contains(&status) {
            serde_json::from_str(&text)?
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        interpret_reply(status, &body)
    }
}

#[async_trait]
impl CompletionBackend for ProxyClient {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> String {
        let pair = PromptPair {
            prompt: prompt.to_string(),
            system_prompt: system_prompt.to_string(),
        };
        as_display_text(self.try_complete(&pair).await)
    }
}

/// Runs the proxy handler inside this process, for local use without a
/// deployed function. The key still only lives in the handler's provider.
pub struct InProcessProxy<C: CredentialProvider> {
    handler: ProxyHandler<C>,
}

impl<C: CredentialProvider> InProcessProxy<C> {
    pub fn new(handler: ProxyHandler<C>) -> Self {
        Self { handler }
    }

    pub async fn try_complete(&self, pair: &PromptPair) -> Result<String> {
        let event = ProxyEvent::post(serde_json::to_string(pair)?);
        let response = self.handler.handle(&event).await;
        interpret_reply(response.status_code, &response.json())
    }
}

#[async_trait]
impl<C: CredentialProvider> CompletionBackend for InProcessProxy<C> {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> String {
        let pair = PromptPair {
            prompt: prompt.to_string(),
            system_prompt: system_prompt.to_string(),
        };
        as_display_text(self.try_complete(&pair).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interpret_success() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "Bright and floral."}}]});
        assert_eq!(interpret_reply(200, &body).unwrap(), "Bright and floral.");
    }

    #[test]
    fn test_interpret_error_with_message() {
        let err = interpret_reply(429, &json!({"error": "Rate limit reached"})).unwrap_err();
        assert_eq!(as_display_text(Err(err)), "Error: Rate limit reached");
    }

    #[test]
    fn test_interpret_error_without_message() {
        let err = interpret_reply(502, &Value::Null).unwrap_err();
        assert_eq!(as_display_text(Err(err)), "Error: Failed to contact AI service");
    }

    #[test]
    fn test_interpret_success_without_content() {
        assert!(interpret_reply(200, &json!({"choices": []})).is_err());
    }
}
