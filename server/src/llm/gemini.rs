//! Google Gemini `generateContent` client.
//!
//! Translates provider-neutral messages into Gemini `contents` / `parts`, tool
//! definitions into function declarations, and function calls back into
//! [`ContentBlock::ToolUse`]. Gemini does not assign call ids, so ids are
//! minted here. Pure request building and parsing for testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::config::LlmTimeouts;
use super::types::{ChatResponse, Content, ContentBlock, LlmError, Message, Tool};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key })
    }

    /// # Errors
    ///
    /// Returns an [`LlmError`] on transport failure, non-200 status, or an
    /// unparseable body.
    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
        tools: Option<&[Tool]>,
    ) -> Result<ChatResponse, LlmError> {
        let body = build_request(max_tokens, system, messages, tools);
        let url = format!("{API_BASE}/{model}:generateContent");

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text, model)
    }
}

// =============================================================================
// WIRE TYPES: REQUEST
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTools<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(default, skip_serializing)]
    function_call: Option<FunctionCall>,
    /// Set on reasoning summaries; such parts are dropped.
    #[serde(default, skip_serializing)]
    thought: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize, Debug)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTools<'a> {
    function_declarations: Vec<FunctionDeclaration<'a>>,
}

#[derive(Serialize)]
struct FunctionDeclaration<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

impl<'a> From<&'a Tool> for FunctionDeclaration<'a> {
    fn from(tool: &'a Tool) -> Self {
        Self { name: &tool.name, description: &tool.description, parameters: &tool.input_schema }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig<'a> {
    function_calling_config: FunctionCallingConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionCallingConfig<'a> {
    mode: &'static str,
    allowed_function_names: Vec<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

// =============================================================================
// WIRE TYPES: RESPONSE
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: UsageMetadata,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: GeminiContent,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

// =============================================================================
// REQUEST BUILDING
// =============================================================================

fn build_request<'a>(
    max_tokens: u32,
    system: &str,
    messages: &[Message],
    tools: Option<&'a [Tool]>,
) -> GenerateRequest<'a> {
    let system_instruction = (!system.trim().is_empty())
        .then(|| GeminiContent { role: None, parts: vec![Part { text: Some(system.to_string()), ..Part::default() }] });

    let tools_list = tools.unwrap_or_default();
    let declarations: Vec<GeminiTools<'a>> = if tools_list.is_empty() {
        Vec::new()
    } else {
        vec![GeminiTools { function_declarations: tools_list.iter().map(FunctionDeclaration::from).collect() }]
    };
    // One offered tool means structured output: force the call.
    let tool_config = match tools_list {
        [only] => Some(ToolConfig {
            function_calling_config: FunctionCallingConfig { mode: "ANY", allowed_function_names: vec![&only.name] },
        }),
        _ => None,
    };

    GenerateRequest {
        system_instruction,
        contents: build_contents(messages),
        tools: declarations,
        tool_config,
        generation_config: GenerationConfig { max_output_tokens: max_tokens },
    }
}

/// Only text and image blocks are sent; requests are single-turn.
fn build_contents(messages: &[Message]) -> Vec<GeminiContent> {
    let mut out = Vec::with_capacity(messages.len());
    for message in messages {
        let role = if message.role == "assistant" { "model" } else { "user" };
        let parts: Vec<Part> = match &message.content {
            Content::Text(text) => vec![Part { text: Some(text.clone()), ..Part::default() }],
            Content::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(Part { text: Some(text.clone()), ..Part::default() }),
                    ContentBlock::Image { source } => Some(Part {
                        inline_data: Some(InlineData { mime_type: source.media_type.clone(), data: source.data.clone() }),
                        ..Part::default()
                    }),
                    ContentBlock::ToolUse { .. } | ContentBlock::Thinking { .. } | ContentBlock::Unknown => None,
                })
                .collect(),
        };
        if !parts.is_empty() {
            out.push(GeminiContent { role: Some(role.to_string()), parts });
        }
    }
    out
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str, requested_model: &str) -> Result<ChatResponse, LlmError> {
    let api: GenerateResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(candidate) = api.candidates.into_iter().next() else {
        return Err(LlmError::ApiParse("response has no candidates".into()));
    };

    let content = candidate
        .content
        .parts
        .into_iter()
        .filter(|part| part.thought != Some(true))
        .filter_map(|part| {
            if let Some(call) = part.function_call {
                Some(ContentBlock::ToolUse { id: format!("call_{}", Uuid::new_v4()), name: call.name, input: call.args })
            } else {
                part.text.map(|text| ContentBlock::Text { text })
            }
        })
        .collect();

    Ok(ChatResponse {
        content,
        model: api.model_version.unwrap_or_else(|| requested_model.to_string()),
        stop_reason: candidate.finish_reason.unwrap_or_default(),
        input_tokens: api.usage_metadata.prompt_token_count,
        output_tokens: api.usage_metadata.candidates_token_count,
    })
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
