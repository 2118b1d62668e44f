use super::*;

fn family() -> Vec<FamilyMember> {
    let mut jan = FamilyMember::new("a", "Jan");
    jan.children = vec!["b".into()];
    jan.birth_place = Some("Brno".into());
    let mut karel = FamilyMember::new("b", "Karel");
    karel.parents = vec!["a".into()];
    vec![jan, karel]
}

/// Backend that refuses every write.
struct FullStorage;

impl Storage for FullStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Backend("denied".into()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("quota exceeded".into()))
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("denied".into()))
    }
}

#[test]
fn missing_key_loads_empty() {
    let storage = MemoryStorage::new();
    assert!(load_members(&storage).is_empty());
}

#[test]
fn save_then_load_restores_members() {
    let storage = MemoryStorage::new();
    let members = family();
    save_members(&storage, &members).unwrap();
    assert_eq!(load_members(&storage), members);
}

#[test]
fn stored_value_is_camel_case_json_array() {
    let storage = MemoryStorage::new();
    save_members(&storage, &family()).unwrap();
    let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
    assert!(raw.starts_with('['));
    assert!(raw.contains("\"birthPlace\":\"Brno\""));
}

#[test]
fn malformed_json_loads_empty() {
    let storage = MemoryStorage::new();
    storage.set_item(STORAGE_KEY, "{not json").unwrap();
    assert!(load_members(&storage).is_empty());
}

#[test]
fn wrong_shape_loads_empty() {
    let storage = MemoryStorage::new();
    storage.set_item(STORAGE_KEY, r#"{"members": []}"#).unwrap();
    assert!(load_members(&storage).is_empty());
}

#[test]
fn empty_list_is_not_written() {
    let storage = MemoryStorage::new();
    save_members(&storage, &family()).unwrap();
    save_members(&storage, &[]).unwrap();
    assert_eq!(load_members(&storage).len(), 2);
}

#[test]
fn clear_removes_key() {
    let storage = MemoryStorage::new();
    save_members(&storage, &family()).unwrap();
    clear_members(&storage).unwrap();
    assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());
    assert!(load_members(&storage).is_empty());
}

#[test]
fn failed_write_surfaces_error() {
    let err = save_members(&FullStorage, &family()).unwrap_err();
    assert!(matches!(err, StorageError::Backend(_)));
    assert_eq!(err.to_string(), "storage backend error: quota exceeded");
}

#[test]
fn failed_read_loads_empty() {
    assert!(load_members(&FullStorage).is_empty());
}
