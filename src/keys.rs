//! Unique key assignment
//!
//! Every element of a rendered tree needs a key that no other element shares. Keys derive from
//! the element's authored key (falling back to its name, then its type), dash-cased. The first
//! element with a given base key keeps it; later ones get `-1`, `-2`, ... in document order,
//! skipping anything already taken.

use std::collections::{BTreeMap, HashSet};

use crate::uidl::{ComponentUidl, ElementNode, UidlNode};
use crate::utils::camel_case_to_dash_case;
use crate::visitor::{
    for_each_element, traverse_component_elements_mut, traverse_elements_mut,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupEntry {
    /// Occurrences of this base key in the counted trees.
    pub count: usize,
    /// Next numeric suffix to try.
    pub next_key: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ElementsLookup {
    entries: BTreeMap<String, LookupEntry>,
    taken: HashSet<String>,
}

impl ElementsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup where every seeded key is already taken, so new occurrences start at suffix `1`.
    pub fn seeded<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lookup = Self::new();
        for key in keys {
            let key = key.as_ref().to_string();
            lookup.entries.insert(
                key.clone(),
                LookupEntry {
                    count: 1,
                    next_key: 1,
                },
            );
            lookup.taken.insert(key);
        }
        lookup
    }

    pub fn entry(&self, base: &str) -> Option<&LookupEntry> {
        self.entries.get(base)
    }

    pub fn is_taken(&self, key: &str) -> bool {
        self.taken.contains(key)
    }

    pub fn count_tree(&mut self, node: &UidlNode) {
        for_each_element(node, &mut |el| {
            let base = base_key(el);
            self.entries.entry(base).or_default().count += 1;
        });
    }

    pub fn count_component(&mut self, uidl: &ComponentUidl) {
        self.count_tree(&uidl.node);
        for prop in uidl.prop_definitions.values() {
            if let Some(crate::uidl::DefaultValue::Node(node)) = &prop.default_value {
                self.count_tree(node);
            }
        }
    }

    /// Claims a key derived from `base`.
    pub fn claim(&mut self, base: &str) -> String {
        let entry = self.entries.entry(base.to_string()).or_default();
        if entry.next_key == 0 {
            entry.next_key = 1;
            if self.taken.insert(base.to_string()) {
                return base.to_string();
            }
        }
        loop {
            let candidate = format!("{}-{}", base, entry.next_key);
            entry.next_key += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Marks a key as used without going through suffixing.
    pub fn reserve(&mut self, key: &str) {
        self.taken.insert(key.to_string());
        self.entries.entry(key.to_string()).or_default().next_key = 1;
    }
}

pub fn base_key(element: &ElementNode) -> String {
    let source = if !element.key.is_empty() {
        element.key.as_str()
    } else if let Some(name) = element.name.as_deref().filter(|n| !n.is_empty()) {
        name
    } else {
        element.element_type.as_str()
    };
    camel_case_to_dash_case(source)
}

/// Counts every element of the component into `lookup`.
pub fn create_nodes_lookup(uidl: &ComponentUidl, lookup: &mut ElementsLookup) {
    lookup.count_component(uidl);
}

/// Rewrites every element key of the component (root tree and element prop defaults).
pub fn generate_unique_keys(uidl: &mut ComponentUidl, lookup: &mut ElementsLookup) {
    traverse_component_elements_mut(uidl, |el| {
        let base = base_key(el);
        el.key = lookup.claim(&base);
    });
}

/// Rewrites the keys of a single subtree.
pub fn generate_unique_keys_in(node: &mut UidlNode, lookup: &mut ElementsLookup) {
    traverse_elements_mut(node, |el| {
        let base = base_key(el);
        el.key = lookup.claim(&base);
    });
}

/// Every element key of a tree, in document order.
pub fn collect_keys(node: &UidlNode) -> Vec<String> {
    let mut keys = Vec::new();
    for_each_element(node, &mut |el| keys.push(el.key.clone()));
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{component_uidl, element, element_node};
    use std::collections::BTreeMap;

    fn tree() -> UidlNode {
        element_node(
            "container",
            BTreeMap::new(),
            vec![
                UidlNode::Element(element("text")),
                UidlNode::Element(element("text")),
                UidlNode::Element(ElementNode {
                    key: "MainImage".into(),
                    ..element("image")
                }),
            ],
        )
    }

    #[test]
    fn test_ties_get_incrementing_suffix() {
        let mut uidl = component_uidl("Card", tree());
        let mut lookup = ElementsLookup::new();
        create_nodes_lookup(&uidl, &mut lookup);
        assert_eq!(lookup.entry("text").map(|e| e.count), Some(2));

        generate_unique_keys(&mut uidl, &mut lookup);
        assert_eq!(
            collect_keys(&uidl.node),
            vec!["container", "text", "text-1", "main-image"]
        );
    }

    #[test]
    fn test_seeded_lookup_suffixes_from_one() {
        let mut node = tree();
        let mut lookup = ElementsLookup::seeded(["container", "text", "text-1"]);
        generate_unique_keys_in(&mut node, &mut lookup);
        assert_eq!(
            collect_keys(&node),
            vec!["container-1", "text-2", "text-3", "main-image"]
        );
    }

    #[test]
    fn test_suffix_skips_explicit_keys() {
        let mut node = element_node(
            "container",
            BTreeMap::new(),
            vec![
                UidlNode::Element(ElementNode {
                    key: "text-1".into(),
                    ..element("text")
                }),
                UidlNode::Element(element("text")),
                UidlNode::Element(element("text")),
            ],
        );
        let mut lookup = ElementsLookup::new();
        lookup.reserve("text-1");
        generate_unique_keys_in(&mut node, &mut lookup);
        let keys = collect_keys(&node);
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }
}
