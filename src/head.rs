use crate::chunk::{file_type, ChunkContent, ChunkDefinition, ChunkType};
use crate::error::UidlResult;
use crate::hast::{add_attribute, add_child, create_element, create_text, HastNode};
use crate::plugin::{ComponentPlugin, ComponentStructure, DEFAULT_TEMPLATE_CHUNK_NAME};
use crate::uidl::{AttributeValue, ComponentUidl, ReferenceType, SeoValue};
use crate::utils::value_to_string;

pub const HEAD_CHUNK_NAME: &str = "html-head";

/// Emits `<title>`, `<meta>` and `<link>` tags from the component's SEO block, linked before
/// the template.
#[derive(Debug, Clone, Default)]
pub struct HeadPlugin;

fn seo_value(uidl: &ComponentUidl, value: &SeoValue) -> Option<String> {
    match value {
        SeoValue::Text(text) => Some(text.clone()),
        SeoValue::Attribute(AttributeValue::Static(literal)) => {
            Some(value_to_string(&literal.to_json()))
        }
        SeoValue::Attribute(AttributeValue::Dynamic(reference))
            if reference.reference_type == ReferenceType::Prop =>
        {
            uidl.prop_definitions
                .get(&reference.id)
                .and_then(|prop| prop.default_value.as_ref())
                .and_then(|default| default.as_value())
                .map(value_to_string)
        }
        SeoValue::Attribute(_) => None,
    }
}

impl ComponentPlugin for HeadPlugin {
    fn name(&self) -> &str {
        "html-head"
    }

    fn run(&self, mut structure: ComponentStructure) -> UidlResult<ComponentStructure> {
        let Some(seo) = structure.uidl.seo.as_ref() else {
            return Ok(structure);
        };

        let mut tags = Vec::new();
        if let Some(title) = &seo.title {
            let tag = create_element("title");
            add_child(&tag, create_text(title.clone()));
            tags.push(ChunkContent::Hast(HastNode::Element(tag)));
        }
        for meta in &seo.meta_tags {
            let tag = create_element("meta");
            for (name, value) in meta {
                match seo_value(&structure.uidl, value) {
                    Some(text) => add_attribute(&tag, name, text),
                    None => {
                        tracing::debug!(attribute = %name, "meta attribute has no static value")
                    }
                }
            }
            tags.push(ChunkContent::Hast(HastNode::Element(tag)));
        }
        for asset in &seo.assets {
            let tag = create_element("link");
            add_attribute(&tag, "rel", asset.kind.clone());
            add_attribute(&tag, "href", asset.path.clone());
            tags.push(ChunkContent::Hast(HastNode::Element(tag)));
        }

        if tags.is_empty() {
            return Ok(structure);
        }

        structure.context.push_chunk(ChunkDefinition::new(
            HEAD_CHUNK_NAME,
            ChunkType::Hast,
            file_type::HTML,
            ChunkContent::Many(tags),
        ));
        if let Some(template) = structure.context.chunk_mut(DEFAULT_TEMPLATE_CHUNK_NAME) {
            template.link_after.push(HEAD_CHUNK_NAME.to_string());
        }
        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{component_uidl, static_node};
    use crate::linker::Linker;
    use crate::options::GeneratorOptions;
    use crate::uidl::{Seo, SeoAsset};
    use std::collections::BTreeMap;

    #[test]
    fn test_head_is_linked_before_template() {
        let mut uidl = component_uidl("About", static_node("About us"));
        let mut description = BTreeMap::new();
        description.insert("name".to_string(), SeoValue::Text("description".into()));
        description.insert("content".to_string(), SeoValue::Text("Who we are".into()));
        uidl.seo = Some(Seo {
            title: Some("About".into()),
            meta_tags: vec![description],
            assets: vec![SeoAsset {
                kind: "canonical".into(),
                path: "https://example.com/about".into(),
            }],
        });

        let mut structure = ComponentStructure::new(uidl, GeneratorOptions::default());
        structure.context.push_chunk(ChunkDefinition::new(
            DEFAULT_TEMPLATE_CHUNK_NAME,
            ChunkType::Hast,
            file_type::HTML,
            ChunkContent::Hast(create_text("body")),
        ));

        let result = HeadPlugin.run(structure).unwrap();
        let linked = Linker::default().link(result.chunks()).unwrap();
        assert_eq!(
            linked,
            "<title>About</title>\n\
             <meta content=\"Who we are\" name=\"description\">\n\
             <link href=\"https://example.com/about\" rel=\"canonical\">\n\
             \nbody\n"
        );
    }
}
