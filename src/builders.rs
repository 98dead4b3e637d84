//! Constructors for UIDL nodes, used by tests and by transforms that synthesize nodes.

use std::collections::BTreeMap;

use crate::uidl::{
    AttributeValue, ComponentUidl, ConditionExpression, ConditionalContent, Dependency,
    DependencyType, DynamicReference, ElementNode, Literal, ReferenceType, SlotContent,
    StyleMap, StyleValue, UidlNode,
};

/// An element keyed and named after its type, as hand-written UIDL usually is.
pub fn element(element_type: &str) -> ElementNode {
    ElementNode {
        key: element_type.to_string(),
        element_type: element_type.to_string(),
        name: Some(element_type.to_string()),
        ..Default::default()
    }
}

pub fn element_node(
    element_type: &str,
    attrs: BTreeMap<String, AttributeValue>,
    children: Vec<UidlNode>,
) -> UidlNode {
    UidlNode::Element(ElementNode {
        attrs,
        children,
        ..element(element_type)
    })
}

/// Reference to another component of the same project.
pub fn component(name: &str, key: &str) -> ElementNode {
    ElementNode {
        key: key.to_string(),
        element_type: "component".to_string(),
        name: Some(name.to_string()),
        semantic_type: Some(name.to_string()),
        dependency: Some(local_dependency(name)),
        ..Default::default()
    }
}

pub fn local_dependency(name: &str) -> Dependency {
    Dependency {
        kind: DependencyType::Local,
        path: format!("./{}", crate::utils::camel_case_to_dash_case(name)),
        version: None,
        meta: None,
    }
}

pub fn static_node(value: impl Into<Literal>) -> UidlNode {
    UidlNode::Static(value.into())
}

pub fn static_attr(value: impl Into<Literal>) -> AttributeValue {
    AttributeValue::Static(value.into())
}

pub fn static_style(value: &str) -> StyleValue {
    StyleValue::Static(Literal::Str(value.to_string()))
}

pub fn reference(reference_type: ReferenceType, id: &str) -> DynamicReference {
    DynamicReference {
        reference_type,
        id: id.to_string(),
        ref_path: None,
    }
}

pub fn dynamic_node(reference_type: ReferenceType, id: &str) -> UidlNode {
    UidlNode::Dynamic(reference(reference_type, id))
}

pub fn dynamic_attr(reference_type: ReferenceType, id: &str) -> AttributeValue {
    AttributeValue::Dynamic(reference(reference_type, id))
}

pub fn slot_node() -> UidlNode {
    UidlNode::Slot(SlotContent::default())
}

pub fn conditional_node(
    node: UidlNode,
    reference: UidlNode,
    value: Option<Literal>,
    condition: Option<ConditionExpression>,
) -> UidlNode {
    UidlNode::Conditional(ConditionalContent {
        node: Box::new(node),
        reference: Box::new(reference),
        value,
        condition,
    })
}

pub fn style_map(entries: &[(&str, &str)]) -> StyleMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), static_style(v)))
        .collect()
}

pub fn component_uidl(name: &str, node: UidlNode) -> ComponentUidl {
    ComponentUidl {
        name: name.to_string(),
        node,
        prop_definitions: BTreeMap::new(),
        state_definitions: BTreeMap::new(),
        style_set_definitions: BTreeMap::new(),
        import_definitions: BTreeMap::new(),
        seo: None,
        output_options: None,
    }
}
