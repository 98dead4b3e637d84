//! UIDL Node Model
//!
//! The UIDL tree is pure data. Every node serializes as `{ "type": ..., "content": ... }`
//! with camelCase field names, so component descriptions can be read straight from JSON.
//! Cloning a node always yields an independent value copy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::UidlResult;

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum UidlNode {
    Static(Literal),
    Dynamic(DynamicReference),
    Raw(String),
    Inject(String),
    Slot(SlotContent),
    Element(ElementNode),
    Conditional(ConditionalContent),
    Repeat(RepeatContent),
    Expr(String),
}

impl UidlNode {
    pub fn node_type(&self) -> &'static str {
        match self {
            UidlNode::Static(_) => "static",
            UidlNode::Dynamic(_) => "dynamic",
            UidlNode::Raw(_) => "raw",
            UidlNode::Inject(_) => "inject",
            UidlNode::Slot(_) => "slot",
            UidlNode::Element(_) => "element",
            UidlNode::Conditional(_) => "conditional",
            UidlNode::Repeat(_) => "repeat",
            UidlNode::Expr(_) => "expr",
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            UidlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            UidlNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// Literal values carried by static nodes, static attributes and condition operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Literal {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Bool(b) => serde_json::Value::Bool(*b),
            Literal::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Literal::Str(s) => serde_json::Value::String(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    Prop,
    State,
    Local,
    Attr,
    Children,
    Token,
    Locale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicReference {
    pub reference_type: ReferenceType,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Box<UidlNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalContent {
    pub node: Box<UidlNode>,
    pub reference: Box<UidlNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionExpression>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionExpression {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// `"all"` combines conditions with AND, anything else with OR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_criteria: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatContent {
    pub node: Box<UidlNode>,
    pub data_source: AttributeValue,
    #[serde(default)]
    pub meta: RepeatMeta,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterator_name: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub use_index: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    #[serde(default)]
    pub key: String,
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, Vec<EventHandler>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, StyleValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub referenced_styles: BTreeMap<String, ReferencedStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Abilities>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UidlNode>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub self_closing: bool,
}

impl ElementNode {
    pub fn is_local_component(&self) -> bool {
        matches!(
            self.dependency,
            Some(Dependency {
                kind: DependencyType::Local,
                ..
            })
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum AttributeValue {
    Static(Literal),
    Dynamic(DynamicReference),
    Raw(String),
    Element(ElementNode),
    Import(ImportReference),
    Expr(String),
    Object(serde_json::Value),
}

impl AttributeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Static(_) => "static",
            AttributeValue::Dynamic(_) => "dynamic",
            AttributeValue::Raw(_) => "raw",
            AttributeValue::Element(_) => "element",
            AttributeValue::Import(_) => "import",
            AttributeValue::Expr(_) => "expr",
            AttributeValue::Object(_) => "object",
        }
    }

    /// Literal content of the attribute, when it carries one.
    pub fn literal_content(&self) -> Option<serde_json::Value> {
        match self {
            AttributeValue::Static(lit) => Some(lit.to_json()),
            AttributeValue::Raw(s) | AttributeValue::Expr(s) => {
                Some(serde_json::Value::String(s.clone()))
            }
            AttributeValue::Object(v) => Some(v.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReference {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum StyleValue {
    Static(Literal),
    Dynamic(DynamicReference),
}

pub type StyleMap = BTreeMap<String, StyleValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHandler {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Abilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkAbility>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum LinkAbility {
    #[serde(rename_all = "camelCase")]
    Url {
        url: Box<AttributeValue>,
        #[serde(default)]
        new_tab: bool,
    },
    Section {
        section: String,
    },
    #[serde(rename_all = "camelCase")]
    Navlink {
        route_name: String,
    },
    Mail {
        mail: String,
        #[serde(default)]
        subject: Option<String>,
        #[serde(default)]
        body: Option<String>,
    },
    Phone {
        phone: String,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// STYLES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencedStyle {
    pub id: String,
    pub content: StyleReference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mapType", rename_all = "kebab-case")]
pub enum StyleReference {
    Inlined {
        #[serde(default)]
        conditions: Vec<StyleCondition>,
        #[serde(default)]
        styles: StyleMap,
    },
    #[serde(rename_all = "camelCase")]
    ProjectReferenced { reference_id: String },
    #[serde(rename_all = "camelCase")]
    ComponentReferenced { reference_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "conditionType", rename_all = "kebab-case")]
pub enum StyleCondition {
    ElementState { content: String },
    ScreenSize { meta: ScreenSizeMeta },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSizeMeta {
    pub max_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSetDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_style_set_type")]
    pub kind: String,
    #[serde(default)]
    pub content: StyleMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<StyleSetCondition>,
}

fn default_style_set_type() -> String {
    "reusable-project-style-map".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StyleSetCondition {
    ElementState {
        meta: ElementStateMeta,
        #[serde(default)]
        content: StyleMap,
    },
    ScreenSize {
        meta: ScreenSizeMeta,
        #[serde(default)]
        content: StyleMap,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStateMeta {
    pub state: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Element-typed props default to a node, everything else to a literal JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Node(Box<UidlNode>),
    Value(serde_json::Value),
}

impl DefaultValue {
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            DefaultValue::Value(v) => Some(v),
            DefaultValue::Node(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Library,
    Package,
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(rename = "type")]
    pub kind: DependencyType,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DependencyMeta>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyMeta {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub named_import: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_tags: Vec<BTreeMap<String, SeoValue>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<SeoAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeoValue {
    Text(String),
    Attribute(AttributeValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoAsset {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file_name: Option<String>,
    #[serde(default)]
    pub folder_path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUidl {
    pub name: String,
    #[serde(alias = "rootNode")]
    pub node: UidlNode,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prop_definitions: BTreeMap<String, PropDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub state_definitions: BTreeMap<String, StateDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style_set_definitions: BTreeMap<String, StyleSetDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub import_definitions: BTreeMap<String, Dependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_options: Option<OutputOptions>,
}

impl ComponentUidl {
    pub fn from_json(json: &str) -> UidlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn folder_path(&self) -> &[String] {
        self.output_options
            .as_ref()
            .map(|o| o.folder_path.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_element_tree() {
        let value = json!({
            "name": "Card",
            "node": {
                "type": "element",
                "content": {
                    "key": "card",
                    "elementType": "container",
                    "attrs": { "title": { "type": "static", "content": "Hello" } },
                    "children": [
                        { "type": "static", "content": 3 },
                        { "type": "dynamic", "content": { "referenceType": "prop", "id": "label" } }
                    ]
                }
            },
            "propDefinitions": {
                "label": { "type": "string", "defaultValue": "Card" }
            }
        });

        let uidl: ComponentUidl = serde_json::from_value(value).unwrap();
        let root = uidl.node.as_element().unwrap();
        assert_eq!(root.element_type, "container");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0], UidlNode::Static(Literal::Number(3.0)));
        assert_eq!(
            uidl.prop_definitions["label"].default_value,
            Some(DefaultValue::Value(json!("Card")))
        );
    }

    #[test]
    fn test_element_default_value_parses_as_node() {
        let prop: PropDefinition = serde_json::from_value(json!({
            "type": "element",
            "defaultValue": {
                "type": "element",
                "content": { "key": "icon", "elementType": "image" }
            }
        }))
        .unwrap();
        assert!(matches!(prop.default_value, Some(DefaultValue::Node(_))));
    }

    #[test]
    fn test_root_node_alias() {
        let uidl = ComponentUidl::from_json(
            r#"{"name":"A","rootNode":{"type":"raw","content":"<hr>"}}"#,
        )
        .unwrap();
        assert_eq!(uidl.node, UidlNode::Raw("<hr>".into()));
    }

    #[test]
    fn test_style_condition_tags() {
        let cond: StyleCondition = serde_json::from_value(json!({
            "conditionType": "screen-size",
            "meta": {"maxWidth": 768}
        }))
        .unwrap();
        assert_eq!(
            cond,
            StyleCondition::ScreenSize {
                meta: ScreenSizeMeta { max_width: 768.0 }
            }
        );
    }
}
