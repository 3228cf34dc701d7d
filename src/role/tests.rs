use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use super::parsing::strip_reasoning;
use super::*;
use crate::client::{AIClient, ChatMessage};
use crate::config::{LlmSettings, ModelSettings};
use crate::error::WeaveError;
use crate::tokens::completion_budget;

fn agent_for(server: &MockServer, config: RoleConfig, models: &ModelSettings) -> LlmRoleAgent {
    let settings = LlmSettings {
        api_key: "test-key".to_string(),
        base_url: server.url("/v1"),
        ..LlmSettings::default()
    };
    let client = AIClient::new(&settings).unwrap();
    LlmRoleAgent::new(config, Arc::new(client), models)
}

fn expected_body(prompt: &str, models: &ModelSettings) -> serde_json::Value {
    let messages = vec![ChatMessage::user(prompt)];
    let max_tokens = completion_budget(models.context_tokens, models.max_tokens, &messages).unwrap();
    json!({
        "model": models.generation,
        "messages": [{ "role": "user", "content": prompt }],
        "max_tokens": max_tokens,
        "temperature": 0.0
    })
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[test]
fn template_parse_reports_malformed_placeholders() {
    for source in ["Hello {name", "Hello {Name}", "Hello {}", "Hello }"] {
        let err = PromptTemplate::parse(source).unwrap_err();
        assert!(matches!(err, WeaveError::Configuration(_)), "{source}: {err}");
    }
}

#[test]
fn template_render_inserts_values_verbatim() {
    let template = PromptTemplate::parse("At {organization}: {{literal}} {input}").unwrap();
    assert_eq!(
        template.placeholders().collect::<Vec<_>>(),
        vec!["organization", "input"]
    );

    let rendered = template
        .render(&[("organization", "Acme"), ("input", "use {context} here")])
        .unwrap();
    assert_eq!(rendered, "At Acme: {literal} use {context} here");
}

#[test]
fn template_render_requires_every_placeholder() {
    let template = PromptTemplate::parse("{organization} {input}").unwrap();
    let err = template.render(&[("organization", "Acme")]).unwrap_err();
    assert!(err.to_string().contains("input"));
}

#[test]
fn role_config_rejects_unknown_placeholders() {
    let initial = PromptTemplate::parse("{organization} {feedback}").unwrap();
    let refine = PromptTemplate::parse("{previous_output} {feedback}").unwrap();
    let err = RoleConfig::new(RoleKind::Analyst, "Acme", initial, refine).unwrap_err();
    assert!(matches!(err, WeaveError::Configuration(_)));
    assert!(err.to_string().contains("feedback"));
}

#[test]
fn builtin_role_templates_mention_organization() {
    let analyst = RoleConfig::analyst("Metabase").unwrap();
    let tester = RoleConfig::tester("Metabase").unwrap();

    let request = GenerationRequest {
        organization: analyst.organization(),
        grounding: "CTX",
        primary_input_or_feedback: "Add CSV export",
        is_refinement: false,
    };
    let prompt = request.render(&analyst).unwrap();
    assert!(prompt.contains("Business Analyst at Metabase"));
    assert!(prompt.contains("CTX"));
    assert!(prompt.contains("Add CSV export"));

    let request = GenerationRequest {
        organization: tester.organization(),
        grounding: "PLAN",
        primary_input_or_feedback: "add perf tests",
        is_refinement: true,
    };
    let prompt = request.render(&tester).unwrap();
    assert!(prompt.contains("Software Tester at Metabase"));
    assert!(prompt.contains("PLAN"));
    assert!(prompt.contains("add perf tests"));
}

#[test]
fn strip_reasoning_removes_think_blocks() {
    assert_eq!(strip_reasoning("<think>plan</think>\nStory 1"), "Story 1");
    assert_eq!(strip_reasoning("Story 1 <think>unfinished"), "Story 1");
    assert_eq!(strip_reasoning("  plain  "), "plain");
}

#[tokio::test]
async fn analyst_initial_sends_rendered_prompt() {
    let server = MockServer::start_async().await;
    let models = ModelSettings::default();
    let config = RoleConfig::analyst("Metabase").unwrap();

    let prompt = GenerationRequest {
        organization: "Metabase",
        grounding: "Exports support XLSX.",
        primary_input_or_feedback: "Add CSV export",
        is_refinement: false,
    }
    .render(&config)
    .unwrap();

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("Authorization", "Bearer test-key")
                .json_body(expected_body(&prompt, &models));
            then.status(200).json_body(completion("Story 1: export CSV"));
        })
        .await;

    let agent = agent_for(&server, config, &models);
    assert_eq!(agent.kind(), RoleKind::Analyst);

    let stories = agent
        .generate_initial("Exports support XLSX.", "Add CSV export")
        .await
        .unwrap();

    assert_eq!(stories, "Story 1: export CSV");
    mock.assert_async().await;
}

#[tokio::test]
async fn tester_refine_uses_previous_output_and_feedback() {
    let server = MockServer::start_async().await;
    let models = ModelSettings::default();
    let config = RoleConfig::tester("Acme").unwrap();

    let prompt = GenerationRequest {
        organization: "Acme",
        grounding: "| TC-1 | export |",
        primary_input_or_feedback: "add perf tests",
        is_refinement: true,
    }
    .render(&config)
    .unwrap();

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .json_body(expected_body(&prompt, &models));
            then.status(200)
                .json_body(completion("<think>hmm</think>| TC-1 | export |\n| TC-2 | perf |"));
        })
        .await;

    let agent = agent_for(&server, config, &models);
    let plan = agent
        .refine("| TC-1 | export |", "add perf tests")
        .await
        .unwrap();

    assert_eq!(plan, "| TC-1 | export |\n| TC-2 | perf |");
    mock.assert_async().await;
}

#[tokio::test]
async fn generation_without_choices_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        })
        .await;

    let agent = agent_for(
        &server,
        RoleConfig::analyst("Acme").unwrap(),
        &ModelSettings::default(),
    );
    let err = agent.generate_initial("ctx", "request").await.unwrap_err();
    assert!(matches!(err, WeaveError::Generation(_)));
    assert!(err.to_string().contains("no choices"));
}

#[tokio::test]
async fn generation_maps_http_failures() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(503).body("overloaded");
        })
        .await;

    let agent = agent_for(
        &server,
        RoleConfig::tester("Acme").unwrap(),
        &ModelSettings::default(),
    );
    let err = agent.refine("plan", "feedback").await.unwrap_err();
    assert!(matches!(err, WeaveError::Generation(_)));
    assert!(err.to_string().contains("temporarily unavailable"));
}

#[tokio::test]
async fn oversized_prompt_fails_without_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion("unused"));
        })
        .await;

    let models = ModelSettings {
        context_tokens: 1_000,
        ..ModelSettings::default()
    };
    let agent = agent_for(&server, RoleConfig::analyst("Acme").unwrap(), &models);

    let huge_context = "word ".repeat(2_000);
    let err = agent
        .generate_initial(&huge_context, "request")
        .await
        .unwrap_err();

    assert!(matches!(err, WeaveError::Generation(_)));
    assert!(err.to_string().contains("context window"));
    mock.assert_hits_async(0).await;
}
