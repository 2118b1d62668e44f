//! Document model: family members and the in-memory working set.
//!
//! `FamilyMember` is the person record shared by the browser engine, the
//! client-local store and the server's AI endpoints. Its relationship fields
//! hold plain member ids; nothing here enforces that they resolve or that
//! spouse links are symmetric. `WorkingSet` owns the ordered list of members
//! currently loaded for visualization.
//!
//! Data flows into this layer from the AI intake boundary (parsed narratives
//! and scanned documents) and from client-local storage. The layout engine
//! reads from `WorkingSet::members` to build rows.

#[cfg(test)]
#[path = "member_test.rs"]
mod member_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a family member.
pub type MemberId = String;

/// One person in the family tree, as stored and as exchanged with the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    /// Unique identifier within the working set.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Free-form birth date (`"1890"`, `"12. 3. 1890"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Free-form death date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    /// Free-form birth place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    /// Short biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Ids of this member's parents.
    #[serde(default)]
    pub parents: Vec<MemberId>,
    /// Ids of this member's children.
    #[serde(default)]
    pub children: Vec<MemberId>,
    /// Ids of this member's spouses. May be listed on one side only.
    #[serde(default)]
    pub spouses: Vec<MemberId>,
}

impl FamilyMember {
    /// A member with no descriptive fields and no relationships.
    #[must_use]
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            birth_date: None,
            death_date: None,
            birth_place: None,
            bio: None,
            parents: Vec::new(),
            children: Vec::new(),
            spouses: Vec::new(),
        }
    }

    /// First character of the name, used as the card monogram.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// Ordered list of members currently loaded for visualization.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    members: Vec<FamilyMember>,
}

impl WorkingSet {
    /// Create an empty working set.
    #[must_use]
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Build a working set from an existing list, keeping its order.
    #[must_use]
    pub fn from_members(members: Vec<FamilyMember>) -> Self {
        Self { members }
    }

    /// Replace every member, e.g. with a freshly parsed narrative.
    pub fn replace(&mut self, members: Vec<FamilyMember>) {
        self.members = members;
    }

    /// Append members extracted from a document. No deduplication is done.
    pub fn merge(&mut self, members: Vec<FamilyMember>) {
        self.members.extend(members);
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    /// Look up a member by id. With duplicate ids the last one wins.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FamilyMember> {
        self.members.iter().rev().find(|m| m.id == id)
    }

    /// Build an id → member map. With duplicate ids the last one wins.
    #[must_use]
    pub fn index(&self) -> HashMap<&str, &FamilyMember> {
        index_members(&self.members)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the working set holds no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Build an id → member lookup over `members`. Later duplicates overwrite earlier ones.
#[must_use]
pub fn index_members(members: &[FamilyMember]) -> HashMap<&str, &FamilyMember> {
    let mut map = HashMap::with_capacity(members.len());
    for m in members {
        map.insert(m.id.as_str(), m);
    }
    map
}
