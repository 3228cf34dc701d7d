use httpmock::prelude::*;
use serde_json::json;

use super::*;
use crate::config::{LlmProvider, LlmSettings};

fn settings(base_url: String) -> LlmSettings {
    LlmSettings {
        api_key: "test-key".to_string(),
        base_url,
        ..LlmSettings::default()
    }
}

fn hello_request() -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: "gpt-test".to_string(),
        messages: vec![ChatMessage::user("Hello")],
        max_tokens: Some(128),
        temperature: Some(0.0),
    }
}

#[tokio::test]
async fn chat_completion_successfully_parses_response() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("Authorization", "Bearer test-key")
                .json_body(json!({
                    "model": "gpt-test",
                    "messages": [
                        {"role": "user", "content": "Hello"}
                    ],
                    "max_tokens": 128,
                    "temperature": 0.0
                }));

            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "choices": [
                        {
                            "index": 0,
                            "finish_reason": "stop",
                            "message": {
                                "role": "assistant",
                                "content": "Hi there!"
                            }
                        }
                    ]
                }));
        })
        .await;

    let client = AIClient::new(&settings(server.url("/v1"))).unwrap();
    let response = client.chat_completion(hello_request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.choices.len(), 1);
    assert_eq!(response.choices[0].message.content, "Hi there!");
    assert_eq!(response.choices[0].message.role, ChatMessageRole::Assistant);
    assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn optional_fields_are_omitted_when_unset() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions").json_body(json!({
                "model": "gpt-test",
                "messages": [{"role": "user", "content": "Be brief"}]
            }));
            then.status(200).json_body(json!({ "choices": [] }));
        })
        .await;

    let client = AIClient::new(&settings(server.url("/v1/"))).unwrap();
    let response = client
        .chat_completion(ChatCompletionRequest {
            model: "gpt-test".to_string(),
            messages: vec![ChatMessage::user("Be brief")],
            max_tokens: None,
            temperature: None,
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(response.choices.is_empty());
}

#[tokio::test]
async fn status_codes_map_to_readable_errors() {
    let cases = [
        (429, "monthly quota reached", "Quota exceeded"),
        (429, "slow down", "Too many requests"),
        (401, "bad key", "Invalid API key"),
        (400, "missing model", "Invalid request: missing model"),
        (500, "boom", "temporarily unavailable"),
        (418, "teapot", "API error (status 418"),
    ];

    for (status, body, expected) in cases {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(status).body(body);
            })
            .await;

        let client = AIClient::new(&settings(server.url("/v1"))).unwrap();
        let err = client.chat_completion(hello_request()).await.unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "status {status}: unexpected error '{err}'"
        );
    }
}

#[tokio::test]
async fn malformed_response_reports_parse_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(200).body("not json");
        })
        .await;

    let client = AIClient::new(&settings(server.url("/v1"))).unwrap();
    let err = client
        .embeddings(EmbeddingRequest {
            model: "embed".to_string(),
            input: vec!["text".to_string()],
        })
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse embeddings response JSON"));
}

#[tokio::test]
async fn openrouter_requests_carry_attribution_header() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/chat/completions")
                .header("Authorization", "Bearer test-key")
                .header("X-Title", "weave")
                .header_missing("HTTP-Referer");
            then.status(200).json_body(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "ok"},
                    "finish_reason": null
                }]
            }));
        })
        .await;

    let client = AIClient::new(&LlmSettings {
        provider: LlmProvider::OpenRouter,
        ..settings(server.url("/api/v1"))
    })
    .unwrap();
    let response = client.chat_completion(hello_request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.choices[0].message.content, "ok");
    assert!(response.choices[0].finish_reason.is_none());
}
