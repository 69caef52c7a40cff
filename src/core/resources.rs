//! Known resource entries and the reference trie built from them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::trie::{CaseSensitivity, Trie, TrieBuilder};
use crate::error::ScanError;

/// Identifier of the resource file an entry comes from (usually its path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId(value.to_string())
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One key of a resource file, as seen from code: `Namespace.ClassName.Key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    /// Namespace of the generated resource class (empty for the global namespace).
    #[serde(default)]
    pub namespace: String,
    pub class_name: String,
    pub key: String,
    #[serde(default)]
    pub value: String,
    pub origin: ResourceId,
}

impl ResourceEntry {
    pub fn new(
        namespace: impl Into<String>,
        class_name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        origin: impl Into<ResourceId>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            class_name: class_name.into(),
            key: key.into(),
            value: value.into(),
            origin: origin.into(),
        }
    }

    /// Text matched in source: `ClassName.Key`.
    pub fn reference_key(&self) -> String {
        format!("{}.{}", self.class_name, self.key)
    }

    /// Fully qualified name: `Namespace.ClassName.Key`.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.reference_key()
        } else {
            format!("{}.{}", self.namespace, self.reference_key())
        }
    }
}

pub type ReferenceTrie = Trie<ResourceEntry>;

/// Build the reference trie for one batch of lookups.
///
/// Every entry is registered under `ClassName.Key`; entries sharing that text
/// (same class and key in different namespaces or files) become candidates
/// of the same terminal node. Exact duplicates are registered once.
pub fn build_trie(
    entries: impl IntoIterator<Item = ResourceEntry>,
    case: CaseSensitivity,
) -> Result<ReferenceTrie, ScanError> {
    let mut builder = TrieBuilder::new(case);
    let mut seen = HashSet::new();

    for entry in entries {
        let missing = if entry.class_name.is_empty() {
            Some("class name")
        } else if entry.key.is_empty() {
            Some("key")
        } else {
            None
        };
        if let Some(field) = missing {
            return Err(ScanError::EmptyKey {
                field,
                class_name: entry.class_name,
                key: entry.key,
            });
        }

        if !seen.insert((
            entry.namespace.clone(),
            entry.class_name.clone(),
            entry.key.clone(),
            entry.origin.clone(),
        )) {
            continue;
        }
        builder.add_with_info(&entry.reference_key(), entry);
    }

    Ok(builder.build())
}
