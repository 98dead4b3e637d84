//! UIDL Resolver
//!
//! Normalizes a component against a target mapping. The input is never touched: resolution
//! runs on a clone, in this order:
//!
//! 1. merge the caller mapping over the base mapping
//! 2. clone
//! 3. style sets (sorted conditions, prefixed assets)
//! 4. friendly output options
//! 5. illegal name check (fatal)
//! 6. asset-prefixed prop/state defaults
//! 7. abilities
//! 8. referenced styles and embedded html
//! 9. element mapping
//! 10. unique keys
//! 11. repeat data-source uniqueness (fatal)
//! 12. SEO meta tags

use std::collections::HashSet;

use crate::abilities::{AbilityResolver, LinkAbilityResolver};
use crate::embed::resolve_html_nodes;
use crate::error::{UidlError, UidlResult};
use crate::keys::{create_nodes_lookup, generate_unique_keys, ElementsLookup};
use crate::mapping::{ElementMapping, Mapping};
use crate::options::{AssetsDefinition, GeneratorOptions};
use crate::style_sets::{resolve_referenced_styles, resolve_style_set_definitions};
use crate::uidl::{
    AttributeValue, ComponentUidl, DefaultValue, DependencyType, ElementNode, Literal,
    OutputOptions, ReferenceType, RepeatContent, SeoValue, UidlNode,
};
use crate::utils::{camel_case_to_dash_case, dash_case_to_upper_camel_case, prefix_asset_path};
use crate::visitor::{
    traverse_component_elements_mut, traverse_elements_mut, walk_repeat, UidlVisitor,
};

/// Attributes whose static values are asset paths.
const ASSET_ATTRIBUTES: &[&str] = &["src", "srcset", "poster"];

pub struct Resolver {
    mapping: Mapping,
    abilities: Vec<Box<dyn AbilityResolver>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Mapping::default())
    }
}

impl Resolver {
    pub fn new(mapping: Mapping) -> Self {
        Self {
            mapping,
            abilities: vec![Box::new(LinkAbilityResolver)],
        }
    }

    pub fn with_mappings(mappings: &[Mapping]) -> Self {
        let mut resolver = Self::default();
        for mapping in mappings {
            resolver.add_mapping(mapping);
        }
        resolver
    }

    pub fn add_mapping(&mut self, mapping: &Mapping) {
        self.mapping.merge(mapping);
    }

    pub fn add_ability(&mut self, ability: Box<dyn AbilityResolver>) {
        self.abilities.push(ability);
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    fn effective_mapping(&self, options: &GeneratorOptions) -> Mapping {
        match &options.mapping {
            Some(custom) => self.mapping.clone().merged(custom),
            None => self.mapping.clone(),
        }
    }

    pub fn resolve(
        &self,
        input: &ComponentUidl,
        options: &GeneratorOptions,
    ) -> UidlResult<ComponentUidl> {
        let mapping = self.effective_mapping(options);
        let mut uidl = input.clone();

        resolve_style_set_definitions(&mut uidl.style_set_definitions, &options.assets);
        set_friendly_output_options(&mut uidl);
        check_for_illegal_names(&uidl, &mapping)?;
        prefix_default_values(&mut uidl, &options.assets);

        for ability in &self.abilities {
            ability.resolve(&mut uidl, options)?;
        }

        resolve_referenced_styles(&mut uidl.node, &options.assets);
        resolve_html_nodes(&mut uidl.node);

        traverse_component_elements_mut(&mut uidl, |el| {
            apply_mapping(el, &mapping, options);
        });

        let mut lookup = ElementsLookup::new();
        create_nodes_lookup(&uidl, &mut lookup);
        generate_unique_keys(&mut uidl, &mut lookup);

        ensure_data_source_uniqueness(&mut uidl)?;
        resolve_meta_tags(&mut uidl, &options.assets)?;

        tracing::debug!(component = %uidl.name, "resolved component");
        Ok(uidl)
    }

    /// Applies the mapping to one element subtree, without key assignment.
    pub fn resolve_element(
        &self,
        element: &ElementNode,
        options: &GeneratorOptions,
    ) -> ElementNode {
        let mapping = self.effective_mapping(options);
        let mut node = UidlNode::Element(element.clone());
        traverse_elements_mut(&mut node, |el| apply_mapping(el, &mapping, options));
        match node {
            UidlNode::Element(el) => el,
            _ => element.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT-LEVEL STEPS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn set_friendly_output_options(uidl: &mut ComponentUidl) {
    let file_name = camel_case_to_dash_case(&uidl.name);
    let class_name = dash_case_to_upper_camel_case(&uidl.name);
    let output = uidl.output_options.get_or_insert_with(OutputOptions::default);

    if output.component_class_name.is_none() {
        output.component_class_name = Some(class_name);
    }
    if output.file_name.is_none() {
        output.file_name = Some(file_name);
    }
    let file_name = output.file_name.clone();
    if output.style_file_name.is_none() {
        output.style_file_name = file_name.clone();
    }
    if output.template_file_name.is_none() {
        output.template_file_name = file_name;
    }
}

pub fn check_for_illegal_names(uidl: &ComponentUidl, mapping: &Mapping) -> UidlResult<()> {
    let class_name = uidl
        .output_options
        .as_ref()
        .and_then(|o| o.component_class_name.clone())
        .unwrap_or_else(|| uidl.name.clone());

    if mapping.illegal_class_names.contains(&class_name) {
        return Err(UidlError::IllegalName {
            component: uidl.name.clone(),
            kind: "class",
            name: class_name,
        });
    }

    for prop in uidl.prop_definitions.keys() {
        if mapping.illegal_prop_names.contains(prop) {
            return Err(UidlError::IllegalName {
                component: uidl.name.clone(),
                kind: "prop",
                name: prop.clone(),
            });
        }
    }

    for state in uidl.state_definitions.keys() {
        if mapping.illegal_prop_names.contains(state) {
            return Err(UidlError::IllegalName {
                component: uidl.name.clone(),
                kind: "state",
                name: state.clone(),
            });
        }
    }

    Ok(())
}

fn prefix_default_value(value: &mut Option<DefaultValue>, assets: &AssetsDefinition) {
    if let Some(DefaultValue::Value(serde_json::Value::String(path))) = value {
        *path = prefix_asset_path(path, assets);
    }
}

pub fn prefix_default_values(uidl: &mut ComponentUidl, assets: &AssetsDefinition) {
    for prop in uidl.prop_definitions.values_mut() {
        prefix_default_value(&mut prop.default_value, assets);
    }
    for state in uidl.state_definitions.values_mut() {
        prefix_default_value(&mut state.default_value, assets);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT MAPPING
// ═══════════════════════════════════════════════════════════════════════════════

/// Merges mapped default attributes with the element's own. Dynamic `attr` references in the
/// mapping pull the element's attribute of that id; other defaults never override local values.
fn merge_mapped_attrs(el: &mut ElementNode, mapped: &ElementMapping) {
    for (name, value) in &mapped.attrs {
        match value {
            AttributeValue::Dynamic(reference)
                if reference.reference_type == ReferenceType::Attr =>
            {
                if let Some(local) = el.attrs.remove(&reference.id) {
                    el.attrs.insert(name.clone(), local);
                }
            }
            _ => {
                el.attrs
                    .entry(name.clone())
                    .or_insert_with(|| value.clone());
            }
        }
    }
}

fn insert_children(template: &[UidlNode], children: &mut Vec<UidlNode>) -> Vec<UidlNode> {
    let mut result = Vec::with_capacity(template.len());
    for node in template {
        match node {
            UidlNode::Dynamic(reference) if reference.reference_type == ReferenceType::Children => {
                result.append(children);
            }
            UidlNode::Element(inner) => {
                let mut inner = inner.clone();
                inner.children = insert_children(&inner.children, children);
                result.push(UidlNode::Element(inner));
            }
            other => result.push(other.clone()),
        }
    }
    result
}

pub fn apply_mapping(el: &mut ElementNode, mapping: &Mapping, options: &GeneratorOptions) {
    let original_type = el.element_type.clone();
    if el.name.is_none() {
        el.name = Some(original_type.clone());
    }

    if let Some(mapped) = mapping.elements.get(&original_type) {
        if el.semantic_type.is_none() {
            el.semantic_type = Some(original_type.clone());
        }
        el.element_type = mapped.element_type.clone();
        if el.dependency.is_none() {
            el.dependency = mapped.dependency.clone();
        }
        el.self_closing |= mapped.self_closing;

        merge_mapped_attrs(el, mapped);
        for (event, handlers) in &mapped.events {
            el.events
                .entry(event.clone())
                .or_insert_with(|| handlers.clone());
        }
        if let Some(template) = &mapped.children {
            let mut own = std::mem::take(&mut el.children);
            el.children = insert_children(template, &mut own);
        }
    }

    for (from, to) in &mapping.attributes {
        if let Some(value) = el.attrs.remove(from) {
            el.attrs.insert(to.clone(), value);
        }
    }
    for (from, to) in &mapping.events {
        if let Some(handlers) = el.events.remove(from) {
            el.events.insert(to.clone(), handlers);
        }
    }

    if let (Some(prefix), Some(dependency)) =
        (options.local_dependencies_prefix.as_deref(), el.dependency.as_mut())
    {
        if dependency.kind == DependencyType::Local {
            let name = el.semantic_type.as_deref().or(el.name.as_deref()).unwrap_or("");
            dependency.path = format!("{}{}", prefix, camel_case_to_dash_case(name));
        }
    }

    for attr in ASSET_ATTRIBUTES {
        if let Some(AttributeValue::Static(Literal::Str(path))) = el.attrs.get_mut(*attr) {
            *path = prefix_asset_path(path, &options.assets);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPEATS & SEO
// ═══════════════════════════════════════════════════════════════════════════════

struct DataSourceNamer<'a> {
    used: &'a mut HashSet<String>,
    counter: usize,
}

impl DataSourceNamer<'_> {
    fn next_name(&mut self) -> String {
        loop {
            let name = if self.counter == 0 {
                "items".to_string()
            } else {
                format!("items{}", self.counter)
            };
            self.counter += 1;
            if self.used.insert(name.clone()) {
                return name;
            }
        }
    }
}

impl UidlVisitor for DataSourceNamer<'_> {
    fn visit_repeat(&mut self, repeat: &mut RepeatContent) {
        let is_dynamic = matches!(repeat.data_source, AttributeValue::Dynamic(_));
        if repeat.meta.data_source_identifier.is_none() && !is_dynamic {
            repeat.meta.data_source_identifier = Some(self.next_name());
        }
        walk_repeat(self, repeat);
    }
}

#[derive(Default)]
struct DataSourceCollector {
    used: HashSet<String>,
    duplicate: Option<String>,
}

impl UidlVisitor for DataSourceCollector {
    fn visit_repeat(&mut self, repeat: &mut RepeatContent) {
        if let Some(id) = &repeat.meta.data_source_identifier {
            if !self.used.insert(id.clone()) && self.duplicate.is_none() {
                self.duplicate = Some(id.clone());
            }
        }
        walk_repeat(self, repeat);
    }
}

pub fn ensure_data_source_uniqueness(uidl: &mut ComponentUidl) -> UidlResult<()> {
    let mut collector = DataSourceCollector::default();
    collector.visit_component(uidl);

    if let Some(identifier) = collector.duplicate {
        return Err(UidlError::DuplicateDataSource {
            component: uidl.name.clone(),
            identifier,
        });
    }

    let mut namer = DataSourceNamer {
        used: &mut collector.used,
        counter: 0,
    };
    namer.visit_component(uidl);
    Ok(())
}

pub fn resolve_meta_tags(uidl: &mut ComponentUidl, assets: &AssetsDefinition) -> UidlResult<()> {
    let Some(seo) = uidl.seo.as_mut() else {
        return Ok(());
    };

    for tag in seo.meta_tags.iter_mut() {
        for value in tag.values_mut() {
            match value {
                SeoValue::Text(text)
                | SeoValue::Attribute(AttributeValue::Static(Literal::Str(text))) => {
                    *text = prefix_asset_path(text, assets);
                }
                SeoValue::Attribute(AttributeValue::Dynamic(reference)) => {
                    let known = match reference.reference_type {
                        ReferenceType::Prop => uidl.prop_definitions.contains_key(&reference.id),
                        ReferenceType::State => uidl.state_definitions.contains_key(&reference.id),
                        _ => true,
                    };
                    if !known {
                        return Err(UidlError::MissingDefinition {
                            id: reference.id.clone(),
                            scope: "meta tag",
                        });
                    }
                }
                SeoValue::Attribute(_) => {}
            }
        }
    }

    for asset in seo.assets.iter_mut() {
        asset.path = prefix_asset_path(&asset.path, assets);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{
        component, component_uidl, dynamic_attr, element, element_node, static_attr, static_node,
    };
    use crate::uidl::{PropDefinition, RepeatMeta, Seo};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn page() -> ComponentUidl {
        let mut image = element("image");
        image.attrs.insert("url".into(), static_attr("/static/logo.png"));
        let tree = element_node(
            "container",
            BTreeMap::new(),
            vec![
                element_node("text", BTreeMap::new(), vec![static_node("Hello")]),
                element_node("text", BTreeMap::new(), vec![static_node("World")]),
                UidlNode::Element(image),
            ],
        );
        component_uidl("landing page", tree)
    }

    #[test]
    fn test_mapping_and_keys() {
        let resolver = Resolver::new(Mapping::html());
        let resolved = resolver.resolve(&page(), &GeneratorOptions::default()).unwrap();

        let root = resolved.node.as_element().unwrap();
        assert_eq!(root.element_type, "div");
        assert_eq!(root.semantic_type.as_deref(), Some("container"));
        let keys: Vec<_> = root
            .children
            .iter()
            .map(|c| c.as_element().unwrap().key.clone())
            .collect();
        assert_eq!(keys, vec!["text", "text-1", "image"]);

        let image = root.children[2].as_element().unwrap();
        assert_eq!(image.element_type, "img");
        assert!(image.self_closing);
        assert_eq!(image.attrs["src"], static_attr("/static/logo.png"));
        assert!(!image.attrs.contains_key("url"));
    }

    #[test]
    fn test_resolve_is_deterministic_and_pure() {
        let input = page();
        let before = input.clone();
        let resolver = Resolver::new(Mapping::html());
        let options = GeneratorOptions::default();
        let first = resolver.resolve(&input, &options).unwrap();
        let second = resolver.resolve(&input, &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(input, before);
    }

    #[test]
    fn test_friendly_output_options() {
        let resolved = Resolver::default()
            .resolve(&page(), &GeneratorOptions::default())
            .unwrap();
        let output = resolved.output_options.unwrap();
        assert_eq!(output.component_class_name.as_deref(), Some("LandingPage"));
        assert_eq!(output.file_name.as_deref(), Some("landing-page"));
        assert_eq!(output.style_file_name.as_deref(), Some("landing-page"));
    }

    #[test]
    fn test_illegal_prop_name_is_fatal() {
        let mut uidl = page();
        uidl.prop_definitions.insert(
            "children".into(),
            PropDefinition {
                kind: "string".into(),
                default_value: None,
                is_required: false,
            },
        );
        let err = Resolver::new(Mapping::react())
            .resolve(&uidl, &GeneratorOptions::default())
            .unwrap_err();
        assert!(matches!(err, UidlError::IllegalName { kind: "prop", .. }));
    }

    #[test]
    fn test_caller_mapping_overrides_base() {
        let custom = Mapping {
            elements: [("text".to_string(), ElementMapping::new("p"))]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let options = GeneratorOptions {
            mapping: Some(custom),
            ..Default::default()
        };
        let resolved = Resolver::new(Mapping::html()).resolve(&page(), &options).unwrap();
        let first = resolved.node.as_element().unwrap().children[0]
            .as_element()
            .unwrap();
        assert_eq!(first.element_type, "p");
    }

    #[test]
    fn test_local_attribute_wins_over_mapping_default() {
        let mut mapping = Mapping::html();
        mapping.elements.insert("textinput".into(), {
            let mut m = ElementMapping::new("input");
            m.attrs.insert("type".into(), static_attr("text"));
            m
        });
        let mut input = element("textinput");
        input.attrs.insert("type".into(), static_attr("email"));
        let form = component_uidl("Form", UidlNode::Element(input));
        let resolved = Resolver::new(mapping)
            .resolve(&form, &GeneratorOptions::default())
            .unwrap();
        assert_eq!(resolved.node.as_element().unwrap().attrs["type"], static_attr("email"));
    }

    #[test]
    fn test_local_dependency_prefix() {
        let tree = element_node(
            "container",
            BTreeMap::new(),
            vec![UidlNode::Element(component("PrimaryButton", "button"))],
        );
        let options = GeneratorOptions {
            local_dependencies_prefix: Some("../components/".into()),
            ..Default::default()
        };
        let resolved = Resolver::new(Mapping::html())
            .resolve(&component_uidl("Page", tree), &options)
            .unwrap();
        let child = resolved.node.as_element().unwrap().children[0]
            .as_element()
            .unwrap();
        assert_eq!(
            child.dependency.as_ref().unwrap().path,
            "../components/primary-button"
        );
    }

    fn repeat(source: AttributeValue, identifier: Option<&str>) -> UidlNode {
        UidlNode::Repeat(RepeatContent {
            node: Box::new(UidlNode::Element(element("text"))),
            data_source: source,
            meta: RepeatMeta {
                data_source_identifier: identifier.map(String::from),
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_duplicate_data_source_is_fatal() {
        let tree = element_node(
            "list",
            BTreeMap::new(),
            vec![
                repeat(AttributeValue::Object(json!([1, 2])), Some("items")),
                repeat(AttributeValue::Object(json!([3])), Some("items")),
            ],
        );
        let err = Resolver::default()
            .resolve(&component_uidl("List", tree), &GeneratorOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            UidlError::DuplicateDataSource {
                component: "List".into(),
                identifier: "items".into()
            }
        );
    }

    #[test]
    fn test_duplicate_data_source_inside_element_attribute_is_fatal() {
        let mut card = element("card");
        card.attrs.insert(
            "footer".into(),
            AttributeValue::Element(ElementNode {
                children: vec![repeat(AttributeValue::Object(json!([3])), Some("items"))],
                ..element("container")
            }),
        );
        let mut tree = element_node(
            "list",
            BTreeMap::new(),
            vec![repeat(AttributeValue::Object(json!([1, 2])), Some("items"))],
        );
        tree.as_element_mut().unwrap().children.push(UidlNode::Element(card));

        let err = Resolver::default()
            .resolve(&component_uidl("List", tree), &GeneratorOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            UidlError::DuplicateDataSource {
                component: "List".into(),
                identifier: "items".into()
            }
        );
    }

    #[test]
    fn test_static_data_sources_get_distinct_names() {
        let tree = element_node(
            "list",
            BTreeMap::new(),
            vec![
                repeat(AttributeValue::Object(json!([1])), None),
                repeat(AttributeValue::Object(json!([2])), Some("items")),
                repeat(dynamic_attr(ReferenceType::Prop, "rows"), None),
            ],
        );
        let resolved = Resolver::default()
            .resolve(&component_uidl("List", tree), &GeneratorOptions::default())
            .unwrap();
        let ids: Vec<_> = resolved
            .node
            .as_element()
            .unwrap()
            .children
            .iter()
            .map(|c| match c {
                UidlNode::Repeat(r) => r.meta.data_source_identifier.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![Some("items1".to_string()), Some("items".to_string()), None]);
    }

    #[test]
    fn test_meta_tag_with_unknown_prop_is_fatal() {
        let mut uidl = page();
        let mut tag = BTreeMap::new();
        tag.insert(
            "content".to_string(),
            SeoValue::Attribute(dynamic_attr(ReferenceType::Prop, "description")),
        );
        uidl.seo = Some(Seo {
            title: Some("Landing".into()),
            meta_tags: vec![tag],
            assets: vec![],
        });
        let err = Resolver::default()
            .resolve(&uidl, &GeneratorOptions::default())
            .unwrap_err();
        assert!(matches!(err, UidlError::MissingDefinition { .. }));
    }
}
