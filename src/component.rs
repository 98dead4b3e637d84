//! Component inlining
//!
//! Static HTML has no component runtime, so every reference to a local component is expanded
//! in place: the component's UIDL is cloned, its keys are made unique against everything the
//! page already uses, the caller's children fill its slot, and the clone is generated inside a
//! `display: contents` wrapper with the caller's attributes as its prop and state defaults.
//! The clone's own styles are emitted as a separate CSS chunk.

use std::collections::BTreeMap;

use crate::builders::static_style;
use crate::chunk::{file_type, ChunkContent, ChunkDefinition, ChunkMeta, ChunkType};
use crate::context::CompileContext;
use crate::error::{UidlError, UidlResult};
use crate::hast::{HastHandle, HastNode};
use crate::html::{add_node_to_lookup, generate_element_node, HtmlEnv, Scope};
use crate::keys::{collect_keys, create_nodes_lookup, generate_unique_keys, ElementsLookup};
use crate::plugin::{run_pipeline, ComponentPlugin, ComponentStructure, DEFAULT_TEMPLATE_CHUNK_NAME};
use crate::uidl::{
    AttributeValue, ComponentUidl, DefaultValue, ElementNode, PropDefinition, ReferenceType,
    StateDefinition, UidlNode,
};
use crate::utils::{camel_case_to_dash_case, hash_suffix};

/// Name the root application component is registered under.
const APP_COMPONENT: &str = "AppComponent";

/// Key of a component in the externals registry.
pub(crate) fn registry_name(name: &str) -> String {
    if name == "Component" {
        APP_COMPONENT.to_string()
    } else {
        name.to_string()
    }
}

fn external_name(element: &ElementNode) -> String {
    registry_name(
        element
            .semantic_type
            .as_deref()
            .or(element.name.as_deref())
            .unwrap_or(element.element_type.as_str()),
    )
}

/// Expands a local component reference and returns the handle of its wrapper element.
pub fn generate_component_content(
    node: &mut ElementNode,
    scope: &Scope,
    ctx: &mut CompileContext,
    env: &HtmlEnv,
) -> UidlResult<HastHandle> {
    let component_name = external_name(node);
    let external = env
        .externals
        .get(&component_name)
        .ok_or_else(|| UidlError::MissingExternal {
            name: component_name.clone(),
        })?;
    let mut instance = external.clone();

    let mut lookup =
        ElementsLookup::seeded(ctx.nodes_lookup.keys().chain(ctx.reserved_keys.iter()));
    create_nodes_lookup(&instance, &mut lookup);
    generate_unique_keys(&mut instance, &mut lookup);
    ctx.reserved_keys.extend(collect_keys(&instance.node));

    let children = std::mem::take(&mut node.children);
    if !children.is_empty() && !replace_first_slot(&mut instance.node, children) {
        tracing::debug!(component = %component_name, "no slot found, children dropped");
    }

    let combined_props = combine_props(scope.props, &instance.prop_definitions);
    let mut combined_states = scope.states.clone();
    combined_states.extend(instance.state_definitions.clone());

    let states_for_instance = instance_states(node, combined_states)?;
    let props_for_instance = instance_props(node, combined_props, scope, ctx, env)?;

    let wrapper_key = wrapper_key(&component_name, &node.key, ctx);
    let root = std::mem::replace(&mut instance.node, UidlNode::Raw(String::new()));
    let mut wrapper = ElementNode {
        key: wrapper_key.clone(),
        element_type: wrapper_key.clone(),
        name: Some(wrapper_key),
        children: vec![root],
        ..Default::default()
    };
    wrapper.style.insert("display".into(), static_style("contents"));

    let mut hierarchy = scope.hierarchy.to_vec();
    hierarchy.push(component_name.clone());

    let tag = {
        let instance_scope = Scope {
            props: &props_for_instance,
            states: &states_for_instance,
            hierarchy: &hierarchy,
        };
        generate_element_node(&mut wrapper, &instance_scope, ctx, env)?
    };

    instance.node = UidlNode::Element(wrapper);
    instance.prop_definitions = props_for_instance;
    instance.state_definitions = states_for_instance;
    run_instance_plugins(instance, &tag, ctx, env)?;

    add_node_to_lookup(&node.key, node, tag.clone(), ctx, &hierarchy)?;
    Ok(tag)
}

/// Caller props without element-typed ones, overridden by the component's own definitions.
fn combine_props(
    caller: &BTreeMap<String, PropDefinition>,
    own: &BTreeMap<String, PropDefinition>,
) -> BTreeMap<String, PropDefinition> {
    let mut combined: BTreeMap<String, PropDefinition> = caller
        .iter()
        .filter(|(_, def)| def.kind != "element")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    combined.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
    combined
}

fn instance_states(
    node: &ElementNode,
    combined: BTreeMap<String, StateDefinition>,
) -> UidlResult<BTreeMap<String, StateDefinition>> {
    combined
        .into_iter()
        .map(|(key, mut definition)| {
            match node.attrs.get(&key) {
                Some(AttributeValue::Object(_)) => {
                    return Err(UidlError::UnsupportedAttribute {
                        name: key,
                        reason: "object attributes cannot seed state in html".into(),
                    })
                }
                Some(attr) => {
                    if let Some(value) = attr.literal_content() {
                        definition.default_value = Some(DefaultValue::Value(value));
                    }
                }
                None => {}
            }
            Ok((key, definition))
        })
        .collect()
}

fn instance_props(
    node: &mut ElementNode,
    combined: BTreeMap<String, PropDefinition>,
    scope: &Scope,
    ctx: &mut CompileContext,
    env: &HtmlEnv,
) -> UidlResult<BTreeMap<String, PropDefinition>> {
    let mut props = BTreeMap::new();
    for (key, mut definition) in combined {
        match node.attrs.get_mut(&key) {
            Some(AttributeValue::Element(attr_element)) => {
                // Generated in the caller's scope so its references resolve against the caller.
                generate_element_node(attr_element, scope, ctx, env)?;
                definition.default_value = Some(DefaultValue::Node(Box::new(UidlNode::Element(
                    attr_element.clone(),
                ))));
            }
            Some(AttributeValue::Dynamic(reference)) => {
                definition = match reference.reference_type {
                    ReferenceType::Prop => scope
                        .props
                        .get(&reference.id)
                        .cloned()
                        .unwrap_or(definition),
                    ReferenceType::State => scope
                        .states
                        .get(&reference.id)
                        .map(|state| PropDefinition {
                            kind: state.kind.clone(),
                            default_value: state.default_value.clone(),
                            is_required: false,
                        })
                        .unwrap_or(definition),
                    other => {
                        return Err(UidlError::UnsupportedReference {
                            id: reference.id.clone(),
                            reason: format!("{:?} references cannot be forwarded in html", other),
                            snapshot: crate::error::snapshot(&*reference),
                        })
                    }
                };
            }
            Some(AttributeValue::Object(value)) => {
                definition.default_value = Some(DefaultValue::Value(value.clone()));
            }
            Some(attr) => {
                if let Some(value) = attr.literal_content() {
                    definition.default_value = Some(DefaultValue::Value(value));
                }
            }
            None => {}
        }
        props.insert(key, definition);
    }
    Ok(props)
}

/// `{name}-wrapper`, suffixed with a hash of the reference key once the plain key is in use.
fn wrapper_key(component_name: &str, reference_key: &str, ctx: &CompileContext) -> String {
    let base = camel_case_to_dash_case(&format!("{}-wrapper", component_name));
    if !ctx.is_key_used(&base) {
        return base;
    }
    let mut seed = reference_key.to_string();
    loop {
        let candidate = format!("{}-{}", base, hash_suffix(&seed));
        if !ctx.is_key_used(&candidate) {
            return candidate;
        }
        seed.push('#');
    }
}

/// Replaces the first slot in document order with `children`.
fn replace_first_slot(node: &mut UidlNode, children: Vec<UidlNode>) -> bool {
    let mut children = Some(children);
    splice_slot(node, &mut children)
}

fn splice_slot(node: &mut UidlNode, children: &mut Option<Vec<UidlNode>>) -> bool {
    match node {
        UidlNode::Element(element) => {
            for index in 0..element.children.len() {
                if matches!(element.children[index], UidlNode::Slot(_)) {
                    let replacement = children.take().unwrap_or_default();
                    element.children.splice(index..=index, replacement);
                    return true;
                }
                if splice_slot(&mut element.children[index], children) {
                    return true;
                }
            }
            false
        }
        UidlNode::Conditional(conditional) => splice_slot(&mut conditional.node, children),
        UidlNode::Repeat(repeat) => splice_slot(&mut repeat.node, children),
        _ => false,
    }
}

/// Runs the style plugin (and any extra sub-component plugins) over the instance alone, then
/// hoists its CSS chunks and dependencies into the page context.
fn run_instance_plugins(
    instance: ComponentUidl,
    tag: &HastHandle,
    ctx: &mut CompileContext,
    env: &HtmlEnv,
) -> UidlResult<()> {
    let template = ChunkDefinition::new(
        DEFAULT_TEMPLATE_CHUNK_NAME,
        ChunkType::Hast,
        file_type::HTML,
        ChunkContent::Hast(HastNode::Element(tag.clone())),
    )
    .with_meta(ChunkMeta {
        nodes_lookup: Some(ctx.nodes_lookup.clone()),
    });

    let mut structure = ComponentStructure::new(instance, env.options.clone());
    structure.context.dependencies = ctx.dependencies.clone();
    structure.context.push_chunk(template);

    let mut stages: Vec<&dyn ComponentPlugin> = vec![env.style_plugin];
    stages.extend(env.plugins.iter().map(|p| p.as_ref()));
    let result = run_pipeline(&stages, structure)?;

    let ComponentStructure { context, .. } = result;
    for chunk in context.chunks {
        if chunk.file_type == file_type::CSS {
            ctx.push_chunk(chunk);
        }
    }
    ctx.merge_dependencies(context.dependencies);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{element, element_node, slot_node, static_node};
    use serde_json::Value;

    #[test]
    fn test_first_slot_takes_children() {
        let mut tree = element_node(
            "container",
            BTreeMap::new(),
            vec![
                element_node("header", BTreeMap::new(), vec![slot_node()]),
                slot_node(),
            ],
        );
        assert!(replace_first_slot(
            &mut tree,
            vec![static_node("a"), static_node("b")]
        ));

        let root = tree.as_element().unwrap();
        let header = root.children[0].as_element().unwrap();
        assert_eq!(header.children, vec![static_node("a"), static_node("b")]);
        assert_eq!(root.children[1], slot_node());
    }

    #[test]
    fn test_no_slot_reports_false() {
        let mut tree = UidlNode::Element(element("text"));
        assert!(!replace_first_slot(&mut tree, vec![static_node("a")]));
    }

    #[test]
    fn test_wrapper_key_hashes_when_taken() {
        let mut ctx = CompileContext::new();
        assert_eq!(wrapper_key("HeroBanner", "hero", &ctx), "hero-banner-wrapper");

        ctx.reserved_keys.insert("hero-banner-wrapper".into());
        let second = wrapper_key("HeroBanner", "hero-1", &ctx);
        assert!(second.starts_with("hero-banner-wrapper-"));
        assert_eq!(second, wrapper_key("HeroBanner", "hero-1", &ctx));
    }

    #[test]
    fn test_element_props_are_not_inherited() {
        let mut caller = BTreeMap::new();
        caller.insert(
            "icon".to_string(),
            PropDefinition {
                kind: "element".into(),
                default_value: None,
                is_required: false,
            },
        );
        caller.insert(
            "title".to_string(),
            PropDefinition {
                kind: "string".into(),
                default_value: Some(DefaultValue::Value(Value::String("Page".into()))),
                is_required: false,
            },
        );
        let combined = combine_props(&caller, &BTreeMap::new());
        assert!(combined.contains_key("title"));
        assert!(!combined.contains_key("icon"));
    }
}
