use crate::config::proxy::ProxyConfig;
use crate::utils::error::Result;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

/// Raw upstream answer; the body is left for the caller to interpret.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

/// Chat-completion client for the LLM provider.
pub struct UpstreamClient {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub async fn chat(&self, api_key: &str, prompt: &str, system_prompt: &str) -> Result<UpstreamReply> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!("Calling upstream {} with model {}", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Upstream response status: {}", status);

        Ok(UpstreamReply { status, body })
    }
}
