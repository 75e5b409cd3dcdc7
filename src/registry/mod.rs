//! Function registry
//!
//! Static table of library functions keyed by name. The registry is built
//! once by the process entry point ([`FunctionRegistry::builtin`]) and then
//! shared by reference; it is never mutated after construction.
//!
//! # Name collisions
//!
//! Entries are indexed by their `name` field in load order. When two entries
//! share a name the later one wins the name index and the earlier one is
//! shadowed: it stays reachable through [`FunctionRegistry::get_functions`]
//! for its namespace but no longer answers [`FunctionRegistry::get_function`].
//! This is a known limitation, not an override mechanism. Shadowed names are
//! logged at construction and listed by [`FunctionRegistry::shadowed`].

pub mod builtin;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Metadata for one library function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    pub namespace: String,
    pub signature: String,
    pub description: String,
    pub priority: i32,
}

impl FunctionEntry {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        signature: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            signature: signature.into(),
            description: description.into(),
            priority,
        }
    }
}

/// A name whose earlier entry lost the name index to a later one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedEntry {
    pub name: String,
    /// Namespace of the entry that no longer resolves by name
    pub shadowed_namespace: String,
    /// Namespace of the entry that now resolves by name
    pub winning_namespace: String,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    entries: Vec<FunctionEntry>,
    by_name: FxHashMap<String, usize>,
    by_namespace: FxHashMap<String, Vec<usize>>,
    namespaces: Vec<String>,
    shadowed: Vec<ShadowedEntry>,
}

impl FunctionRegistry {
    /// Registry over the compiled-in Phel function table
    pub fn builtin() -> Self {
        Self::from_entries(builtin::builtin_entries())
    }

    /// Builds a registry from entries in load order
    pub fn from_entries(entries: impl IntoIterator<Item = FunctionEntry>) -> Self {
        let entries: Vec<FunctionEntry> = entries.into_iter().collect();

        let mut by_namespace: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut namespaces = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let group = by_namespace.entry(entry.namespace.clone()).or_insert_with(|| {
                namespaces.push(entry.namespace.clone());
                Vec::new()
            });
            group.push(index);
        }

        let mut by_name: FxHashMap<String, usize> = FxHashMap::default();
        let mut shadowed = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            if let Some(previous) = by_name.insert(entry.name.clone(), index) {
                let earlier = &entries[previous];
                warn!(
                    "registry entry {}/{} shadows earlier entry from namespace {}",
                    entry.namespace, entry.name, earlier.namespace
                );
                shadowed.push(ShadowedEntry {
                    name: entry.name.clone(),
                    shadowed_namespace: earlier.namespace.clone(),
                    winning_namespace: entry.namespace.clone(),
                });
            }
        }

        info!(
            "function registry loaded: {} entries in {} namespaces ({} shadowed)",
            entries.len(),
            namespaces.len(),
            shadowed.len()
        );

        Self {
            entries,
            by_name,
            by_namespace,
            namespaces,
            shadowed,
        }
    }

    /// Looks up a function by name; `None` for unknown names
    pub fn get_function(&self, name: &str) -> Option<&FunctionEntry> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    /// Functions of a namespace in load order; empty for unknown namespaces
    pub fn get_functions<'a>(&'a self, namespace: &str) -> impl Iterator<Item = &'a FunctionEntry> + use<'a> {
        self.by_namespace
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&index| &self.entries[index])
    }

    /// Every entry in load order, shadowed ones included
    pub fn get_all_functions(&self) -> &[FunctionEntry] {
        &self.entries
    }

    /// Namespaces in order of first appearance
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn shadowed(&self) -> &[ShadowedEntry] {
        &self.shadowed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, namespace: &str, priority: i32) -> FunctionEntry {
        FunctionEntry::new(name, namespace, format!("({} x)", name), "", priority)
    }

    #[test]
    fn test_lookup_and_grouping() {
        let registry = FunctionRegistry::from_entries(vec![
            entry("map", "core", 10),
            entry("str/join", "str", 5),
            entry("filter", "core", 8),
        ]);

        assert_eq!(registry.get_function("map").unwrap().priority, 10);
        let core: Vec<_> = registry.get_functions("core").map(|f| f.name.as_str()).collect();
        assert_eq!(core, vec!["map", "filter"]);
        assert_eq!(registry.namespaces(), &["core".to_string(), "str".to_string()]);
    }

    #[test]
    fn test_unknown_names_fail_silently() {
        let registry = FunctionRegistry::from_entries(vec![entry("map", "core", 10)]);
        assert!(registry.get_function("nope").is_none());
        assert_eq!(registry.get_functions("nope").count(), 0);
    }

    #[test]
    fn test_later_entry_shadows_earlier_name() {
        let registry = FunctionRegistry::from_entries(vec![
            entry("encode", "json", 5),
            entry("encode", "base64", 3),
        ]);

        assert_eq!(registry.get_function("encode").unwrap().namespace, "base64");
        // The shadowed entry is still listed under its own namespace
        assert_eq!(registry.get_functions("json").count(), 1);
        assert_eq!(
            registry.shadowed(),
            &[ShadowedEntry {
                name: "encode".to_string(),
                shadowed_namespace: "json".to_string(),
                winning_namespace: "base64".to_string(),
            }]
        );
    }

    #[test]
    fn test_builtin_registry_covers_all_namespaces() {
        let registry = FunctionRegistry::builtin();
        for namespace in ["core", "str", "json", "html", "http", "base64", "test", "php", "repl"] {
            assert!(
                registry.get_functions(namespace).count() > 0,
                "namespace {} should not be empty",
                namespace
            );
        }
        assert!(registry.shadowed().is_empty());
    }
}
