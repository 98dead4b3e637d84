use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;

use crate::chunk::ChunkDefinition;
use crate::hast::HastHandle;
use crate::uidl::Dependency;

/// Map from node key to generated output. Each key can be inserted once.
#[derive(Debug, Clone)]
pub struct NodesLookup<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for NodesLookup<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> NodesLookup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands `value` back when `key` is already present.
    pub fn try_insert(&mut self, key: &str, value: T) -> Result<(), T> {
        match self.entries.entry(key.to_string()) {
            btree_map::Entry::Occupied(_) => Err(value),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared mutable state of one component compilation.
///
/// `chunks` only grows, `dependencies` merge by key, `nodes_lookup` is insert-once.
#[derive(Debug, Clone, Default)]
pub struct CompileContext {
    pub chunks: Vec<ChunkDefinition>,
    pub dependencies: BTreeMap<String, Dependency>,
    pub nodes_lookup: NodesLookup<HastHandle>,
    /// Keys of the page tree that generated instances must not take.
    pub reserved_keys: HashSet<String>,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chunk(&mut self, chunk: ChunkDefinition) {
        self.chunks.push(chunk);
    }

    pub fn add_dependency(&mut self, name: &str, dependency: Dependency) {
        self.dependencies.insert(name.to_string(), dependency);
    }

    pub fn merge_dependencies(&mut self, other: BTreeMap<String, Dependency>) {
        self.dependencies.extend(other);
    }

    pub fn chunk(&self, name: &str) -> Option<&ChunkDefinition> {
        self.chunks.iter().find(|c| c.name == name)
    }

    pub fn chunk_mut(&mut self, name: &str) -> Option<&mut ChunkDefinition> {
        self.chunks.iter_mut().find(|c| c.name == name)
    }

    /// True when `key` is generated already or reserved by the page tree.
    pub fn is_key_used(&self, key: &str) -> bool {
        self.nodes_lookup.contains_key(key) || self.reserved_keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_lookup_is_insert_once() {
        let mut lookup = NodesLookup::new();
        assert!(lookup.try_insert("card", 1).is_ok());
        assert_eq!(lookup.try_insert("card", 2), Err(2));
        assert_eq!(lookup.get("card"), Some(&1));
        assert_eq!(lookup.len(), 1);
    }
}
