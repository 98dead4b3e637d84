//! Markup tree
//!
//! Elements are shared handles: the nodes lookup keeps a handle to every generated element so
//! later stages (styles, head injection) can decorate it in place after the tree is built.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub type HastHandle = Rc<RefCell<HastElement>>;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq)]
pub enum HastNode {
    Element(HastHandle),
    Text(String),
    /// Inserted without escaping.
    Raw(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HastElement {
    pub tag_name: String,
    pub properties: BTreeMap<String, String>,
    pub children: Vec<HastNode>,
}

impl HastElement {
    pub fn add_class(&mut self, class: &str) {
        let entry = self.properties.entry("class".to_string()).or_default();
        if entry.split_whitespace().any(|c| c == class) {
            return;
        }
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(class);
    }
}

pub fn create_element(tag_name: &str) -> HastHandle {
    Rc::new(RefCell::new(HastElement {
        tag_name: tag_name.to_string(),
        ..Default::default()
    }))
}

pub fn create_text(text: impl Into<String>) -> HastNode {
    HastNode::Text(text.into())
}

pub fn create_comment(text: impl Into<String>) -> HastNode {
    HastNode::Comment(text.into())
}

pub fn add_attribute(element: &HastHandle, name: &str, value: impl Into<String>) {
    element
        .borrow_mut()
        .properties
        .insert(name.to_string(), value.into());
}

pub fn add_child(element: &HastHandle, child: HastNode) {
    element.borrow_mut().children.push(child);
}

pub fn prepend_child(element: &HastHandle, child: HastNode) {
    element.borrow_mut().children.insert(0, child);
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRINTER
// ═══════════════════════════════════════════════════════════════════════════════

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

pub fn to_html(node: &HastNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &HastNode, out: &mut String) {
    match node {
        HastNode::Text(text) => out.push_str(&escape_text(text)),
        HastNode::Raw(raw) => out.push_str(raw),
        HastNode::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        HastNode::Element(handle) => {
            let element = handle.borrow();
            out.push('<');
            out.push_str(&element.tag_name);
            for (name, value) in &element.properties {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
            out.push('>');
            if is_void_element(&element.tag_name) {
                return;
            }
            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag_name);
            out.push('>');
        }
    }
}
