//! Intake: coerces untrusted AI collaborator output into [`FamilyMember`]s.
//!
//! The narrative parser and the document scanner both return JSON that is
//! only shaped like a member list. This module is the single place that
//! decides what a usable record is. Missing ids are minted, missing names get
//! a placeholder, scalar fields accept strings or numbers, and relationship
//! fields that are absent or malformed become empty lists. Anything that is
//! not list-shaped at all is rejected.

#[cfg(test)]
#[path = "intake_test.rs"]
mod intake_test;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::member::{FamilyMember, MemberId};

/// Placeholder name for records that carry none.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Errors produced when AI output cannot be read as a member list.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// The text was not valid JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    /// The JSON was valid but not an array (or an object holding one).
    #[error("expected a list of family members, got {0}")]
    NotAList(&'static str),
}

/// Coerce a JSON value into members.
///
/// Accepts an array of records, or an object with a `members` array.
/// Elements that are not objects are skipped.
///
/// # Errors
///
/// Returns [`IntakeError::NotAList`] when no member array can be found.
pub fn members_from_value(value: &Value) -> Result<Vec<FamilyMember>, IntakeError> {
    let records = match value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("members") {
            Some(Value::Array(items)) => items,
            _ => return Err(IntakeError::NotAList("object without a members array")),
        },
        other => return Err(IntakeError::NotAList(json_kind(other))),
    };

    let members: Vec<FamilyMember> = records
        .iter()
        .filter_map(Value::as_object)
        .map(member_from_record)
        .collect();

    if members.len() < records.len() {
        log::debug!("intake: skipped {} non-object records", records.len() - members.len());
    }
    Ok(members)
}

/// Parse model output text into members.
///
/// Markdown code fences around the JSON are stripped first.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidJson`] for unparseable text and
/// [`IntakeError::NotAList`] for JSON that is not a member list.
pub fn members_from_text(text: &str) -> Result<Vec<FamilyMember>, IntakeError> {
    let body = strip_code_fence(text);
    let value: Value = serde_json::from_str(body).map_err(|e| IntakeError::InvalidJson(e.to_string()))?;
    members_from_value(&value)
}

fn member_from_record(record: &Map<String, Value>) -> FamilyMember {
    let id = scalar(record, "id").unwrap_or_else(|| Uuid::new_v4().to_string());
    let name = scalar(record, "name").unwrap_or_else(|| UNKNOWN_NAME.to_string());

    // Document scans report `date` / `place` / `role` instead of the full shape.
    let birth_date = scalar(record, "birthDate").or_else(|| scalar(record, "date"));
    let birth_place = scalar(record, "birthPlace").or_else(|| scalar(record, "place"));
    let bio = scalar(record, "bio").or_else(|| scalar(record, "role"));

    FamilyMember {
        id,
        name,
        birth_date,
        death_date: scalar(record, "deathDate"),
        birth_place,
        bio,
        parents: id_list(record, "parents"),
        children: id_list(record, "children"),
        spouses: id_list(record, "spouses"),
    }
}

/// A trimmed string or number field. Empty strings count as absent.
fn scalar(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_list(record: &Map<String, Value>, key: &str) -> Vec<MemberId> {
    let Some(Value::Array(items)) = record.get(key) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
