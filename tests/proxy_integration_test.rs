use coffee_architect::adapters::ProxyClient;
use coffee_architect::core::prompts::PromptPair;
use coffee_architect::proxy::{ProxyEvent, ProxyHandler, StaticCredentials};
use coffee_architect::{ArchitectError, ProxyConfig};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn config_for(server: &MockServer) -> ProxyConfig {
    ProxyConfig {
        endpoint: server.url("/v1/chat/completions"),
        ..ProxyConfig::default()
    }
}

fn flavor_request() -> String {
    json!({
        "prompt": "Describe the sensory experience of a Hot CAFFE LATTE.",
        "systemPrompt": "You are a technical coffee architect."
    })
    .to_string()
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_success_is_passed_through_with_headers() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("Authorization", "Bearer sk-test")
                .body_contains("\"model\":\"gpt-4\"")
                .body_contains("\"max_tokens\":500")
                .body_contains("Hot CAFFE LATTE");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(completion("Velvety and sweet."));
        })
        .await;

    let handler = ProxyHandler::new(config_for(&server), StaticCredentials::new("sk-test")).unwrap();
    let response = handler.handle(&ProxyEvent::post(flavor_request())).await;

    upstream.assert_async().await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers["Content-Type"], "application/json");
    assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    assert_eq!(
        response.json()["choices"][0]["message"]["content"],
        "Velvety and sweet."
    );
    assert!(!response.body.contains("sk-test"));
}

#[tokio::test]
async fn test_missing_credential_never_reaches_upstream() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(completion("unreachable"));
        })
        .await;

    let handler = ProxyHandler::new(config_for(&server), StaticCredentials::missing()).unwrap();
    let response = handler.handle(&ProxyEvent::post(flavor_request())).await;

    assert_eq!(response.status_code, 500);
    let error = response.json()["error"].as_str().unwrap().to_string();
    assert!(error.contains("not configured"));
    assert!(error.contains("OPENAI_API_KEY"));
    assert_eq!(upstream.hits_async().await, 0);
}

#[tokio::test]
async fn test_non_post_is_rejected() {
    let server = MockServer::start_async().await;
    let handler = ProxyHandler::new(config_for(&server), StaticCredentials::new("sk-test")).unwrap();

    let event = ProxyEvent {
        http_method: "GET".to_string(),
        body: None,
    };
    let response = handler.handle(&event).await;

    assert_eq!(response.status_code, 405);
    assert_eq!(response.json(), json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn test_upstream_error_status_and_message_are_kept() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).json_body(json!({
                "error": {"message": "Rate limit reached for gpt-4", "type": "requests"}
            }));
        })
        .await;

    let handler = ProxyHandler::new(config_for(&server), StaticCredentials::new("sk-test")).unwrap();
    let response = handler.handle(&ProxyEvent::post(flavor_request())).await;

    assert_eq!(response.status_code, 429);
    assert_eq!(response.json()["error"], "Rate limit reached for gpt-4");
}

#[tokio::test]
async fn test_upstream_error_without_message_uses_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;

    let handler = ProxyHandler::new(config_for(&server), StaticCredentials::new("sk-test")).unwrap();
    let response = handler.handle(&ProxyEvent::post(flavor_request())).await;

    assert_eq!(response.status_code, 502);
    assert_eq!(response.json()["error"], "OpenAI API error");
}

#[tokio::test]
async fn test_unreachable_upstream_is_a_server_error() {
    let config = ProxyConfig {
        endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        timeout_seconds: 5,
        ..ProxyConfig::default()
    };
    let handler = ProxyHandler::new(config, StaticCredentials::new("sk-test")).unwrap();
    let response = handler.handle(&ProxyEvent::post(flavor_request())).await;

    assert_eq!(response.status_code, 500);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .starts_with("Server error: "));
}

#[tokio::test]
async fn test_proxy_client_reads_first_choice() {
    let server = MockServer::start_async().await;
    let proxy = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/.netlify/functions/openai-proxy")
                .json_body(json!({"prompt": "p", "systemPrompt": "s"}));
            then.status(200).json_body(completion("## Dose\n**18g**"));
        })
        .await;

    let client = ProxyClient::new(
        server.url("/.netlify/functions/openai-proxy"),
        Duration::from_secs(5),
    )
    .unwrap();
    let pair = PromptPair {
        prompt: "p".to_string(),
        system_prompt: "s".to_string(),
    };

    let text = tokio_test::assert_ok!(client.try_complete(&pair).await);
    assert_eq!(text, "## Dose\n**18g**");
    proxy.assert_async().await;
}

#[tokio::test]
async fn test_proxy_client_surfaces_error_field() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/openai");
            then.status(500).json_body(json!({
                "error": "OpenAI API key not configured on server."
            }));
        })
        .await;

    let client = ProxyClient::new(server.url("/openai"), Duration::from_secs(5)).unwrap();
    let pair = PromptPair {
        prompt: "p".to_string(),
        system_prompt: "s".to_string(),
    };

    let err = tokio_test::assert_err!(client.try_complete(&pair).await);
    match err {
        ArchitectError::UpstreamError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "OpenAI API key not configured on server.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
