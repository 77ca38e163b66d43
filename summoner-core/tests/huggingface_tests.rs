//! Hugging Face provider and fallback client against a mock inference API

#![cfg(feature = "llm-huggingface")]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use summoner_core::config::GenerationConfig;
use summoner_core::conversation::{ConversationContext, TurnHistory};
use summoner_core::error::SummonerError;
use summoner_core::llm::providers::HuggingFaceProvider;
use summoner_core::llm::{FallbackClient, LLMProvider, LLMRequest, PromptContext};
use summoner_core::retry::RetryConfig;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

fn model_path() -> String {
    format!("/models/{}", MODEL)
}

fn provider(server: &MockServer) -> HuggingFaceProvider {
    HuggingFaceProvider::new("hf_test", MODEL, Some(server.uri()), Duration::from_secs(5))
        .expect("client builds")
}

#[tokio::test]
async fn test_generation_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path()))
        .and(header("authorization", "Bearer hf_test"))
        .and(body_partial_json(json!({
            "inputs": "Qui est Ahri ?",
            "parameters": {
                "max_new_tokens": 500,
                "top_p": 0.95,
                "do_sample": true,
                "return_full_text": false,
                "stop": ["Question:", "\n\n"]
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"generated_text": "  Ahri est une mage.  "}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = LLMRequest::from_prompt("Qui est Ahri ?").with_generation(&GenerationConfig::default());
    let response = provider(&server).generate_request(&request).await.unwrap();
    assert_eq!(response.content, "Ahri est une mage.");
}

#[tokio::test]
async fn test_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("model loading"))
        .mount(&server)
        .await;

    let request = LLMRequest::from_prompt("Bonjour");
    let err = provider(&server).generate_request(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.is_retryable());

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path()))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let err = provider(&server).generate_request(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_unexpected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "oops"})))
        .mount(&server)
        .await;

    let err = provider(&server)
        .generate_request(&LLMRequest::from_prompt("Bonjour"))
        .await
        .unwrap_err();
    assert!(matches!(err, SummonerError::MalformedPayload(_)));
}

#[tokio::test]
async fn test_fallback_client_retries_and_cleans() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path()))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(model_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"generated_text": "Réponse: Le jungler parcourt la jungle."}])),
        )
        .mount(&server)
        .await;

    let retry = RetryConfig::default()
        .with_initial_delay(Duration::from_millis(1))
        .with_jitter(false);
    let client = FallbackClient::new(
        Arc::new(provider(&server)),
        GenerationConfig::default(),
        Duration::from_secs(5),
        retry,
    );

    let context = ConversationContext::new();
    let history = TurnHistory::new(5);
    let prompt = PromptContext {
        context: &context,
        subject: None,
        matchups: None,
        history: &history,
    };

    let reply = client
        .complete("c'est quoi un jungler ?", &prompt, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(reply, "Le jungler parcourt la jungle.");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_fallback_client_gives_up_on_outage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path()))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let retry = RetryConfig::default()
        .with_max_attempts(2)
        .with_initial_delay(Duration::from_millis(1))
        .with_jitter(false);
    let client = FallbackClient::new(
        Arc::new(provider(&server)),
        GenerationConfig::default(),
        Duration::from_secs(5),
        retry,
    );

    let context = ConversationContext::new();
    let history = TurnHistory::new(5);
    let prompt = PromptContext {
        context: &context,
        subject: None,
        matchups: None,
        history: &history,
    };

    let err = client
        .complete("question", &prompt, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
