//! Genealogy service — the three AI collaborators behind the studio.
//!
//! DESIGN
//! ======
//! - `parse_narrative`: free-text family story → a cross-linked member list.
//! - `analyze_document`: scanned birth/marriage/death record → partial members.
//! - `verify_member`: one member → free-text archival research summary.
//!
//! The structured collaborators force a single tool so the model answers with
//! tool arguments. When a provider answers in prose anyway, the JSON is dug
//! out of the text. Either way the payload goes through `lineage::intake`,
//! which is the only place that decides what a usable member looks like.

use lineage::intake::{self, IntakeError};
use lineage::member::FamilyMember;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::tools::{RECORD_DOCUMENT_PEOPLE, RECORD_FAMILY_MEMBERS, record_document_people, record_family_members};
use crate::llm::types::{ChatResponse, ContentBlock, LlmError, Message};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenealogyError {
    #[error("{0} is empty")]
    EmptyInput(&'static str),
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("unusable AI output: {0}")]
    Intake(#[from] IntakeError),
    #[error("AI returned an empty answer")]
    EmptyAnswer,
}

impl ErrorCode for GenealogyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput(_) => "E_EMPTY_INPUT",
            Self::InvalidImage(_) => "E_INVALID_IMAGE",
            Self::Llm(_) => "E_LLM_ERROR",
            Self::Intake(_) => "E_BAD_AI_OUTPUT",
            Self::EmptyAnswer => "E_EMPTY_ANSWER",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            Self::Intake(_) | Self::EmptyAnswer => true,
            Self::EmptyInput(_) | Self::InvalidImage(_) => false,
        }
    }
}

// =============================================================================
// PROMPTS
// =============================================================================

const NARRATIVE_SYSTEM: &str = "You are a genealogist. Read the family story and record every person it \
mentions by calling recordFamilyMembers exactly once. Give each person a short unique id and link parents, \
children, and spouses by those ids, listing each relationship on both people. Keep names, dates, and places \
as written; leave a field out rather than guess.";

const DOCUMENT_SYSTEM: &str = "You read historical civil and parish records (birth, marriage, death). \
Record every person named on the document by calling recordDocumentPeople exactly once. For each person give \
the name as written, the date and place of the recorded event, and their role on the record. Transcribe \
old scripts faithfully; leave a field out when it is illegible.";

const VERIFY_SYSTEM: &str = "You are an archival research assistant for family historians. Given one person \
from a family tree, summarize where records about them are most likely held (civil registries, parish books, \
census returns, regional archives), which details look inconsistent or need confirming, and concrete next \
steps. Be concise and say plainly when something cannot be confirmed.";

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Parse a free-text family story into members.
///
/// # Errors
///
/// Returns [`GenealogyError::EmptyInput`] for a blank story, and LLM or
/// intake errors when the model fails or answers with something unusable.
pub async fn parse_narrative(
    llm: &dyn LlmChat,
    max_tokens: u32,
    story: &str,
) -> Result<Vec<FamilyMember>, GenealogyError> {
    let story = story.trim();
    if story.is_empty() {
        return Err(GenealogyError::EmptyInput("story"));
    }
    info!(story_len = story.len(), "genealogy: parsing narrative");

    let tools = [record_family_members()];
    let messages = [Message::user_text(format!("<story>{story}</story>"))];
    let response = llm.chat(max_tokens, NARRATIVE_SYSTEM, &messages, Some(&tools)).await?;
    log_usage("narrative", &response);

    let members = members_from_response(&response, RECORD_FAMILY_MEMBERS)?;
    info!(members = members.len(), "genealogy: narrative parsed");
    Ok(members)
}

/// Extract the people named on a scanned record.
///
/// `image_base64` may carry a `data:` URL prefix, which is stripped.
///
/// # Errors
///
/// Returns [`GenealogyError::InvalidImage`] for a non-image MIME type or
/// malformed base64, and LLM or intake errors as for [`parse_narrative`].
pub async fn analyze_document(
    llm: &dyn LlmChat,
    max_tokens: u32,
    image_base64: &str,
    mime_type: &str,
) -> Result<Vec<FamilyMember>, GenealogyError> {
    let mime_type = mime_type.trim();
    if !mime_type.starts_with("image/") {
        return Err(GenealogyError::InvalidImage(format!("unsupported MIME type '{mime_type}'")));
    }
    let data = strip_data_url(image_base64);
    if data.is_empty() {
        return Err(GenealogyError::EmptyInput("image"));
    }
    if !is_base64(data) {
        return Err(GenealogyError::InvalidImage("payload is not base64".into()));
    }
    info!(mime_type, image_len = data.len(), "genealogy: analyzing document");

    let tools = [record_document_people()];
    let messages = [Message::user_blocks(vec![
        ContentBlock::image_base64(mime_type, data),
        ContentBlock::Text { text: "Extract the people named on this record.".into() },
    ])];
    let response = llm.chat(max_tokens, DOCUMENT_SYSTEM, &messages, Some(&tools)).await?;
    log_usage("document", &response);

    let members = members_from_response(&response, RECORD_DOCUMENT_PEOPLE)?;
    info!(members = members.len(), "genealogy: document analyzed");
    Ok(members)
}

/// Ask for an archival research summary about one member.
///
/// # Errors
///
/// Returns [`GenealogyError::EmptyInput`] for a nameless member,
/// [`GenealogyError::EmptyAnswer`] when the model says nothing, and LLM errors.
pub async fn verify_member(
    llm: &dyn LlmChat,
    max_tokens: u32,
    member: &FamilyMember,
) -> Result<String, GenealogyError> {
    if member.name.trim().is_empty() {
        return Err(GenealogyError::EmptyInput("member name"));
    }
    info!(member_id = %member.id, "genealogy: verifying member");

    let messages = [Message::user_text(describe_member(member))];
    let response = llm.chat(max_tokens, VERIFY_SYSTEM, &messages, None).await?;
    log_usage("verify", &response);

    let text = response.text().trim().to_string();
    if text.is_empty() {
        return Err(GenealogyError::EmptyAnswer);
    }
    Ok(text)
}

// =============================================================================
// HELPERS
// =============================================================================

fn members_from_response(response: &ChatResponse, tool: &str) -> Result<Vec<FamilyMember>, GenealogyError> {
    if let Some(input) = response.tool_input(tool) {
        return Ok(intake::members_from_value(input)?);
    }
    warn!(tool, stop_reason = %response.stop_reason, "genealogy: no tool call; reading JSON from text");
    Ok(intake::members_from_text(&response.text())?)
}

fn log_usage(collaborator: &'static str, response: &ChatResponse) {
    info!(
        collaborator,
        model = %response.model,
        stop_reason = %response.stop_reason,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "genealogy: LLM response"
    );
}

fn describe_member(member: &FamilyMember) -> String {
    let mut out = format!("<member>\nName: {}\n", member.name);
    for (label, value) in [
        ("Born", &member.birth_date),
        ("Died", &member.death_date),
        ("Birthplace", &member.birth_place),
        ("Notes", &member.bio),
    ] {
        if let Some(value) = value {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }
    out.push_str("</member>");
    out
}

fn strip_data_url(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    }
}

fn is_base64(data: &str) -> bool {
    data.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'-' | b'_') || b.is_ascii_whitespace())
}

#[cfg(test)]
#[path = "genealogy_test.rs"]
mod tests;
