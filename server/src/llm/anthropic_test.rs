use super::*;
use crate::llm::types::Content;

fn make_response(content: serde_json::Value) -> String {
    serde_json::json!({
        "id": "msg_123",
        "type": "message",
        "role": "assistant",
        "content": content,
        "model": "claude-sonnet-4-5-20250929",
        "stop_reason": "tool_use",
        "usage": { "input_tokens": 100, "output_tokens": 50 }
    })
    .to_string()
}

fn record_tool() -> Tool {
    Tool { name: "recordFamilyMembers".into(), description: "d".into(), input_schema: serde_json::json!({}) }
}

#[test]
fn parse_tool_use_response() {
    let json = make_response(serde_json::json!([
        { "type": "tool_use", "id": "tu_1", "name": "recordFamilyMembers", "input": { "members": [{ "name": "Jan" }] } }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.stop_reason, "tool_use");
    assert_eq!(resp.input_tokens, 100);
    assert_eq!(resp.output_tokens, 50);
    let input = resp.tool_input("recordFamilyMembers").unwrap();
    assert_eq!(input["members"][0]["name"], "Jan");
}

#[test]
fn parse_text_response() {
    let json = make_response(serde_json::json!([{ "type": "text", "text": "Records suggest..." }]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.text(), "Records suggest...");
}

#[test]
fn parse_filters_thinking_and_unknown_blocks() {
    let json = make_response(serde_json::json!([
        { "type": "thinking", "thinking": "hmm" },
        { "type": "some_future_type", "data": {} },
        { "type": "text", "text": "answer" }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert!(matches!(&resp.content[0], ContentBlock::Text { text } if text == "answer"));
}

#[test]
fn parse_missing_stop_reason_is_empty() {
    let json = serde_json::json!({
        "content": [],
        "model": "m",
        "stop_reason": null,
        "usage": { "input_tokens": 1, "output_tokens": 2 }
    })
    .to_string();
    assert_eq!(parse_response(&json).unwrap().stop_reason, "");
}

#[test]
fn parse_invalid_json() {
    let err = parse_response("not json").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[test]
fn single_tool_is_forced() {
    let tools = [record_tool()];
    let messages = [Message::user_text("story")];
    let body = serde_json::to_value(build_request("m", 64, "sys", &messages, Some(&tools))).unwrap();
    assert_eq!(body["tool_choice"], serde_json::json!({ "type": "tool", "name": "recordFamilyMembers" }));
    assert_eq!(body["tools"][0]["name"], "recordFamilyMembers");
}

#[test]
fn no_tools_omits_tool_fields() {
    let messages = [Message::user_text("story")];
    let body = serde_json::to_value(build_request("m", 64, "sys", &messages, None)).unwrap();
    assert!(body.get("tools").is_none());
    assert!(body.get("tool_choice").is_none());
    assert_eq!(body["system"], "sys");
}

#[test]
fn image_blocks_pass_through_unchanged() {
    let messages = [Message {
        role: "user".into(),
        content: Content::Blocks(vec![ContentBlock::image_base64("image/jpeg", "AAAA")]),
    }];
    let body = serde_json::to_value(build_request("m", 64, "sys", &messages, None)).unwrap();
    assert_eq!(body["messages"][0]["content"][0]["source"]["media_type"], "image/jpeg");
}
