//! Target mapping tables
//!
//! A mapping translates abstract element types, event names and attribute names into their
//! target equivalents. Mappings compose key-wise: a later mapping overrides earlier entries
//! for the same key, and illegal-name lists accumulate.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::uidl::{
    AttributeValue, Dependency, DynamicReference, EventHandler, ReferenceType, UidlNode,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    #[serde(default)]
    pub elements: BTreeMap<String, ElementMapping>,
    #[serde(default)]
    pub events: BTreeMap<String, String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub illegal_class_names: Vec<String>,
    #[serde(default)]
    pub illegal_prop_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMapping {
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
    /// Default attributes. A dynamic `attr` reference pulls the node's own attribute of that id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, Vec<EventHandler>>,
    /// Wrapping children. A dynamic `children` reference marks where the node's children go.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<UidlNode>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub self_closing: bool,
}

impl ElementMapping {
    pub fn new(element_type: &str) -> Self {
        Self {
            element_type: element_type.to_string(),
            ..Default::default()
        }
    }

    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    /// Maps attribute `name` on the target to attribute `from` of the abstract node.
    pub fn with_attr_from(mut self, name: &str, from: &str) -> Self {
        self.attrs.insert(
            name.to_string(),
            AttributeValue::Dynamic(DynamicReference {
                reference_type: ReferenceType::Attr,
                id: from.to_string(),
                ref_path: None,
            }),
        );
        self
    }
}

impl Mapping {
    /// Merges `other` on top of `self`.
    pub fn merge(&mut self, other: &Mapping) {
        for (key, value) in &other.elements {
            self.elements.insert(key.clone(), value.clone());
        }
        for (key, value) in &other.events {
            self.events.insert(key.clone(), value.clone());
        }
        for (key, value) in &other.attributes {
            self.attributes.insert(key.clone(), value.clone());
        }
        for name in &other.illegal_class_names {
            if !self.illegal_class_names.contains(name) {
                self.illegal_class_names.push(name.clone());
            }
        }
        for name in &other.illegal_prop_names {
            if !self.illegal_prop_names.contains(name) {
                self.illegal_prop_names.push(name.clone());
            }
        }
    }

    pub fn merged(mut self, other: &Mapping) -> Self {
        self.merge(other);
        self
    }

    pub fn html() -> Self {
        HTML_MAPPING.clone()
    }

    pub fn react() -> Self {
        REACT_MAPPING.clone()
    }

    pub fn vue() -> Self {
        VUE_MAPPING.clone()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILT-IN TARGETS
// ═══════════════════════════════════════════════════════════════════════════════

fn markup_elements() -> BTreeMap<String, ElementMapping> {
    let entries = vec![
        ("container", ElementMapping::new("div")),
        ("group", ElementMapping::new("div")),
        ("section", ElementMapping::new("section")),
        ("text", ElementMapping::new("span")),
        ("label", ElementMapping::new("label")),
        ("button", ElementMapping::new("button")),
        ("form", ElementMapping::new("form")),
        ("list", ElementMapping::new("ul")),
        ("list-item", ElementMapping::new("li")),
        ("textarea", ElementMapping::new("textarea")),
        ("video", ElementMapping::new("video").with_attr_from("src", "url")),
        ("audio", ElementMapping::new("audio").with_attr_from("src", "url")),
        ("html-node", ElementMapping::new("div")),
        (
            "image",
            ElementMapping::new("img")
                .with_attr_from("src", "url")
                .self_closing(),
        ),
        ("link", ElementMapping::new("a").with_attr_from("href", "url")),
        ("textinput", ElementMapping::new("input").self_closing()),
        ("separator", ElementMapping::new("hr").self_closing()),
    ];
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

lazy_static! {
    static ref HTML_MAPPING: Mapping = {
        let mut elements = markup_elements();
        elements.insert(
            "navlink".to_string(),
            ElementMapping::new("a").with_attr_from("href", "transitionTo"),
        );
        Mapping {
            elements,
            events: BTreeMap::new(),
            attributes: BTreeMap::new(),
            illegal_class_names: Vec::new(),
            illegal_prop_names: Vec::new(),
        }
    };
    static ref REACT_MAPPING: Mapping = {
        let mut elements = markup_elements();
        elements.insert(
            "navlink".to_string(),
            ElementMapping::new("a").with_attr_from("href", "transitionTo"),
        );
        let events = [
            ("click", "onClick"),
            ("change", "onChange"),
            ("submit", "onSubmit"),
            ("focus", "onFocus"),
            ("blur", "onBlur"),
            ("mouseenter", "onMouseEnter"),
            ("mouseleave", "onMouseLeave"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let attributes = [("class", "className"), ("for", "htmlFor"), ("tabindex", "tabIndex")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Mapping {
            elements,
            events,
            attributes,
            illegal_class_names: names(&["Fragment", "React", "Component", "Link", "Head"]),
            illegal_prop_names: names(&["key", "ref", "children", "dangerouslySetInnerHTML"]),
        }
    };
    static ref VUE_MAPPING: Mapping = {
        let mut elements = markup_elements();
        elements.insert(
            "navlink".to_string(),
            ElementMapping::new("router-link").with_attr_from("to", "transitionTo"),
        );
        Mapping {
            elements,
            events: BTreeMap::new(),
            attributes: BTreeMap::new(),
            illegal_class_names: names(&["Transition", "KeepAlive", "Component", "Slot"]),
            illegal_prop_names: names(&[
                "data", "props", "methods", "computed", "watch", "components", "template",
            ]),
        }
    };
}
