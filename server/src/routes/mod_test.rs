use std::sync::Arc;

use serde_json::{Value, json};

use super::*;
use crate::llm::LlmChat;
use crate::llm::tools::RECORD_DOCUMENT_PEOPLE;
use crate::llm::types::{ChatResponse, ContentBlock, LlmError, Message, Tool};
use crate::state::test_helpers::test_app_state_with_llm;

/// Answers every call with one person found on the record.
struct RecordReader;

#[async_trait::async_trait]
impl LlmChat for RecordReader {
    async fn chat(
        &self,
        _max_tokens: u32,
        _system: &str,
        _messages: &[Message],
        _tools: Option<&[Tool]>,
    ) -> Result<ChatResponse, LlmError> {
        Ok(ChatResponse {
            content: vec![ContentBlock::ToolUse {
                id: "call_1".into(),
                name: RECORD_DOCUMENT_PEOPLE.into(),
                input: json!({ "members": [{ "name": "Marie", "role": "bride" }] }),
            }],
            model: "mock".into(),
            stop_reason: "end_turn".into(),
            input_tokens: 0,
            output_tokens: 0,
        })
    }
}

/// Serve the real router on an ephemeral port and return its base URL.
async fn spawn_app() -> String {
    let app = app(test_app_state_with_llm(Arc::new(RecordReader)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn healthz_is_ok() {
    let base = spawn_app().await;
    let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn document_accepts_scan_larger_than_default_body_limit() {
    let base = spawn_app().await;
    // About 3 MB of base64, over axum's 2 MB default.
    let body = json!({ "image_base64": "A".repeat(3_000_000), "mime_type": "image/jpeg" });

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/lineage/document"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let out: Value = resp.json().await.unwrap();
    assert_eq!(out["members"][0]["name"], "Marie");
    assert_eq!(out["members"][0]["bio"], "bride");
}

#[tokio::test]
async fn malformed_json_body_is_error_body() {
    let base = spawn_app().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/lineage/parse"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let out: Value = resp.json().await.unwrap();
    assert_eq!(out["code"], "E_BAD_REQUEST");
    assert_eq!(out["retryable"], false);
}
