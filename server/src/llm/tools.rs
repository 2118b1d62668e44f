//! Structured-output tool definitions for the genealogy collaborators.
//!
//! Each collaborator offers exactly one tool, which the provider clients then
//! force, so the model's answer arrives as tool arguments rather than prose.

use serde_json::{Value, json};

use super::types::Tool;

/// Tool the narrative parser must call with the full member list.
pub const RECORD_FAMILY_MEMBERS: &str = "recordFamilyMembers";

/// Tool the document scanner must call with the people found on the record.
pub const RECORD_DOCUMENT_PEOPLE: &str = "recordDocumentPeople";

/// `recordFamilyMembers`: a complete, cross-linked member list.
#[must_use]
pub fn record_family_members() -> Tool {
    Tool {
        name: RECORD_FAMILY_MEMBERS.into(),
        description: "Record every person mentioned in the family story, with relationships expressed as ids of \
                      other recorded members."
            .into(),
        input_schema: members_envelope(json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "Short unique id, referenced by relationship lists" },
                "name": { "type": "string", "description": "Full name as written in the story" },
                "birthDate": { "type": "string", "description": "Birth date or year, as precise as the story allows" },
                "deathDate": { "type": "string", "description": "Death date or year" },
                "birthPlace": { "type": "string", "description": "Town or region of birth" },
                "bio": { "type": "string", "description": "One or two sentences about the person" },
                "parents": { "type": "array", "items": { "type": "string" }, "description": "Ids of parents" },
                "children": { "type": "array", "items": { "type": "string" }, "description": "Ids of children" },
                "spouses": { "type": "array", "items": { "type": "string" }, "description": "Ids of spouses" }
            },
            "required": ["id", "name", "parents", "children", "spouses"]
        })),
    }
}

/// `recordDocumentPeople`: people named on a scanned record.
#[must_use]
pub fn record_document_people() -> Tool {
    Tool {
        name: RECORD_DOCUMENT_PEOPLE.into(),
        description: "Record each person named on the birth, marriage, or death record.".into(),
        input_schema: members_envelope(json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Full name as written on the record" },
                "date": { "type": "string", "description": "Date of the recorded event" },
                "place": { "type": "string", "description": "Parish, town, or region of the event" },
                "role": { "type": "string", "description": "Role on the record, e.g. child, father, bride, witness" }
            },
            "required": ["name"]
        })),
    }
}

/// Wrap a per-person schema in the `{ members: [...] }` object every provider accepts.
fn members_envelope(item: Value) -> Value {
    json!({
        "type": "object",
        "properties": {
            "members": { "type": "array", "items": item }
        },
        "required": ["members"]
    })
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
