use crate::uidl::{
    AttributeValue, ComponentUidl, ConditionalContent, DefaultValue, ElementNode, RepeatContent,
    SlotContent, UidlNode,
};

/// The UidlVisitor trait defines the single authoritative traversal over UIDL trees.
///
/// Rules:
/// 1. Traversal order is fixed: an element is visited before its element-typed attributes,
///    which are visited before its children.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers MUST call `walk_*` functions to continue traversal unless pruning is intended.
pub trait UidlVisitor {
    fn visit_component(&mut self, uidl: &mut ComponentUidl) {
        walk_component(self, uidl);
    }

    fn visit_node(&mut self, node: &mut UidlNode) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, element: &mut ElementNode) {
        walk_element(self, element);
    }

    fn visit_conditional(&mut self, conditional: &mut ConditionalContent) {
        walk_conditional(self, conditional);
    }

    fn visit_repeat(&mut self, repeat: &mut RepeatContent) {
        walk_repeat(self, repeat);
    }

    fn visit_slot(&mut self, slot: &mut SlotContent) {
        walk_slot(self, slot);
    }

    fn visit_children(&mut self, children: &mut Vec<UidlNode>) {
        walk_children(self, children);
    }
}

/// Visits the root node, then element-typed prop defaults in prop-name order.
pub fn walk_component<V: UidlVisitor + ?Sized>(visitor: &mut V, uidl: &mut ComponentUidl) {
    visitor.visit_node(&mut uidl.node);
    for prop in uidl.prop_definitions.values_mut() {
        if let Some(DefaultValue::Node(node)) = prop.default_value.as_mut() {
            visitor.visit_node(node);
        }
    }
}

pub fn walk_children<V: UidlVisitor + ?Sized>(visitor: &mut V, children: &mut Vec<UidlNode>) {
    for node in children {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: UidlVisitor + ?Sized>(visitor: &mut V, node: &mut UidlNode) {
    match node {
        UidlNode::Element(el) => visitor.visit_element(el),
        UidlNode::Conditional(c) => visitor.visit_conditional(c),
        UidlNode::Repeat(r) => visitor.visit_repeat(r),
        UidlNode::Slot(s) => visitor.visit_slot(s),
        UidlNode::Static(_)
        | UidlNode::Dynamic(_)
        | UidlNode::Raw(_)
        | UidlNode::Inject(_)
        | UidlNode::Expr(_) => {}
    }
}

pub fn walk_element<V: UidlVisitor + ?Sized>(visitor: &mut V, element: &mut ElementNode) {
    for attr in element.attrs.values_mut() {
        if let AttributeValue::Element(inner) = attr {
            visitor.visit_element(inner);
        }
    }
    visitor.visit_children(&mut element.children);
}

pub fn walk_conditional<V: UidlVisitor + ?Sized>(
    visitor: &mut V,
    conditional: &mut ConditionalContent,
) {
    visitor.visit_node(&mut conditional.node);
}

pub fn walk_repeat<V: UidlVisitor + ?Sized>(visitor: &mut V, repeat: &mut RepeatContent) {
    visitor.visit_node(&mut repeat.node);
}

pub fn walk_slot<V: UidlVisitor + ?Sized>(visitor: &mut V, slot: &mut SlotContent) {
    if let Some(fallback) = slot.fallback.as_mut() {
        visitor.visit_node(fallback);
    }
}

struct ElementFn<F>(F);

impl<F: FnMut(&mut ElementNode)> UidlVisitor for ElementFn<F> {
    fn visit_element(&mut self, element: &mut ElementNode) {
        (self.0)(element);
        walk_element(self, element);
    }
}

/// Pre-order walk calling `f` on every element of the subtree.
pub fn traverse_elements_mut<F: FnMut(&mut ElementNode)>(node: &mut UidlNode, f: F) {
    ElementFn(f).visit_node(node);
}

/// Pre-order walk over the root tree and element-typed prop defaults.
pub fn traverse_component_elements_mut<F: FnMut(&mut ElementNode)>(
    uidl: &mut ComponentUidl,
    f: F,
) {
    ElementFn(f).visit_component(uidl);
}

/// Read-only pre-order walk in the same order as [`UidlVisitor`].
pub fn for_each_element<F: FnMut(&ElementNode)>(node: &UidlNode, f: &mut F) {
    match node {
        UidlNode::Element(el) => for_each_element_in(el, f),
        UidlNode::Conditional(c) => for_each_element(&c.node, f),
        UidlNode::Repeat(r) => for_each_element(&r.node, f),
        UidlNode::Slot(s) => {
            if let Some(fallback) = &s.fallback {
                for_each_element(fallback, f);
            }
        }
        _ => {}
    }
}

pub fn for_each_element_in<F: FnMut(&ElementNode)>(element: &ElementNode, f: &mut F) {
    f(element);
    for attr in element.attrs.values() {
        if let AttributeValue::Element(inner) = attr {
            for_each_element_in(inner, f);
        }
    }
    for child in &element.children {
        for_each_element(child, f);
    }
}

/// Pre-order walk over every node, elements included.
pub fn for_each_node<F: FnMut(&UidlNode)>(node: &UidlNode, f: &mut F) {
    f(node);
    match node {
        UidlNode::Element(el) => {
            for child in &el.children {
                for_each_node(child, f);
            }
        }
        UidlNode::Conditional(c) => for_each_node(&c.node, f),
        UidlNode::Repeat(r) => for_each_node(&r.node, f),
        UidlNode::Slot(s) => {
            if let Some(fallback) = &s.fallback {
                for_each_node(fallback, f);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{element, element_node, slot_node, static_node};
    use std::collections::BTreeMap;

    #[test]
    fn test_pre_order_includes_element_attrs() {
        let mut attrs = BTreeMap::new();
        attrs.insert(
            "icon".to_string(),
            AttributeValue::Element(element("image")),
        );
        let mut tree = element_node(
            "container",
            attrs,
            vec![element_node("text", BTreeMap::new(), vec![static_node("hi")])],
        );

        let mut seen = Vec::new();
        traverse_elements_mut(&mut tree, |el| seen.push(el.element_type.clone()));
        assert_eq!(seen, vec!["container", "image", "text"]);

        let mut read_only = Vec::new();
        for_each_element(&tree, &mut |el| read_only.push(el.element_type.clone()));
        assert_eq!(seen, read_only);
    }

    #[test]
    fn test_for_each_node_visits_leaves() {
        let tree = element_node("container", BTreeMap::new(), vec![slot_node(), static_node(1.0)]);
        let mut types = Vec::new();
        for_each_node(&tree, &mut |n| types.push(n.node_type()));
        assert_eq!(types, vec!["element", "slot", "static"]);
    }
}
