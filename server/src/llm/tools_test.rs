use super::*;

#[test]
fn family_tool_wraps_member_array() {
    let tool = record_family_members();
    assert_eq!(tool.name, RECORD_FAMILY_MEMBERS);
    assert_eq!(tool.input_schema["type"], "object");
    assert_eq!(tool.input_schema["required"], json!(["members"]));
    assert_eq!(tool.input_schema["properties"]["members"]["type"], "array");
}

#[test]
fn family_tool_item_uses_member_field_names() {
    let tool = record_family_members();
    let props = &tool.input_schema["properties"]["members"]["items"]["properties"];
    for field in ["id", "name", "birthDate", "deathDate", "birthPlace", "bio", "parents", "children", "spouses"] {
        assert!(props.get(field).is_some(), "missing {field}");
    }
    assert_eq!(props["spouses"]["items"]["type"], "string");
}

#[test]
fn document_tool_uses_record_fields() {
    let tool = record_document_people();
    assert_eq!(tool.name, RECORD_DOCUMENT_PEOPLE);
    let item = &tool.input_schema["properties"]["members"]["items"];
    assert_eq!(item["required"], json!(["name"]));
    for field in ["name", "date", "place", "role"] {
        assert!(item["properties"].get(field).is_some(), "missing {field}");
    }
}

#[test]
fn tool_names_are_distinct() {
    assert_ne!(record_family_members().name, record_document_people().name);
}
