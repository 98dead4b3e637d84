//! Embedded markup
//!
//! `html-node` elements carry a foreign HTML string in their `html` attribute. The string is
//! parsed with html5ever and converted into ordinary UIDL element/static/raw nodes, so later
//! stages see one uniform tree.

use std::collections::BTreeMap;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::uidl::{AttributeValue, ElementNode, Literal, UidlNode};
use crate::visitor::traverse_elements_mut;

pub const HTML_NODE_TYPE: &str = "html-node";

/// Contents of these elements are kept verbatim instead of being split into nodes.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn parse_html_fragment(html: &str) -> Vec<UidlNode> {
    let dom = match parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
    {
        Ok(dom) => dom,
        Err(err) => {
            tracing::warn!("failed to parse embedded html: {}", err);
            return vec![UidlNode::Raw(html.to_string())];
        }
    };

    let mut nodes = Vec::new();
    collect_body_content(&dom.document, &mut nodes);
    nodes
}

fn collect_body_content(handle: &Handle, nodes: &mut Vec<UidlNode>) {
    match &handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_body_content(child, nodes);
            }
        }
        NodeData::Element { name, .. } => {
            let tag = name.local.to_string();
            // html5ever always synthesizes html/head/body; flatten them away.
            if tag == "html" || tag == "head" || tag == "body" {
                for child in handle.children.borrow().iter() {
                    collect_body_content(child, nodes);
                }
            } else {
                nodes.extend(dom_to_uidl(handle));
            }
        }
        NodeData::Text { .. } => nodes.extend(dom_to_uidl(handle)),
        _ => {}
    }
}

fn dom_to_uidl(handle: &Handle) -> Option<UidlNode> {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() {
                None
            } else {
                Some(UidlNode::Static(Literal::Str(text)))
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.to_string();
            let attrs: BTreeMap<String, AttributeValue> = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    (
                        attr.name.local.to_string(),
                        AttributeValue::Static(Literal::Str(attr.value.to_string())),
                    )
                })
                .collect();

            let children = if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                let text: String = handle
                    .children
                    .borrow()
                    .iter()
                    .filter_map(|child| match &child.data {
                        NodeData::Text { contents } => Some(contents.borrow().to_string()),
                        _ => None,
                    })
                    .collect();
                vec![UidlNode::Raw(text)]
            } else {
                handle
                    .children
                    .borrow()
                    .iter()
                    .filter_map(dom_to_uidl)
                    .collect()
            };

            Some(UidlNode::Element(ElementNode {
                key: tag.clone(),
                element_type: tag.clone(),
                name: Some(tag),
                attrs,
                children,
                ..Default::default()
            }))
        }
        _ => None,
    }
}

/// Replaces the `html` attribute of every `html-node` element with parsed children.
pub fn resolve_html_nodes(node: &mut UidlNode) {
    traverse_elements_mut(node, |el| {
        if el.element_type != HTML_NODE_TYPE {
            return;
        }
        let html = match el.attrs.remove("html") {
            Some(AttributeValue::Static(Literal::Str(html))) => html,
            Some(AttributeValue::Raw(html)) => html,
            Some(other) => {
                el.attrs.insert("html".to_string(), other);
                return;
            }
            None => return,
        };
        el.children = parse_html_fragment(&html);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::element;

    #[test]
    fn test_fragment_becomes_uidl() {
        let nodes = parse_html_fragment(r#"<p class="lead">Hello <b>world</b></p>"#);
        assert_eq!(nodes.len(), 1);
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.element_type, "p");
        assert_eq!(
            p.attrs["class"],
            AttributeValue::Static(Literal::Str("lead".into()))
        );
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.children[0], UidlNode::Static(Literal::Str("Hello ".into())));
    }

    #[test]
    fn test_script_kept_raw() {
        let nodes = parse_html_fragment("<script>if (a < b) run()</script>");
        let script = nodes[0].as_element().unwrap();
        assert_eq!(script.children, vec![UidlNode::Raw("if (a < b) run()".into())]);
    }

    #[test]
    fn test_html_node_resolution() {
        let mut el = element(HTML_NODE_TYPE);
        el.attrs.insert(
            "html".into(),
            AttributeValue::Static(Literal::Str("<hr><span>x</span>".into())),
        );
        let mut node = UidlNode::Element(el);
        resolve_html_nodes(&mut node);
        let el = node.as_element().unwrap();
        assert!(el.attrs.is_empty());
        let types: Vec<_> = el
            .children
            .iter()
            .filter_map(|c| c.as_element().map(|e| e.element_type.clone()))
            .collect();
        assert_eq!(types, vec!["hr", "span"]);
    }
}
