//! Static HTML generation
//!
//! Turns a resolved UIDL tree into markup. Plain HTML has no component runtime and no
//! branching, so local components are inlined (see [`crate::component`]), conditionals are
//! decided from prop defaults, and every dynamic reference is replaced by the default value
//! of the prop or state it points to.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::chunk::{file_type, ChunkContent, ChunkDefinition, ChunkMeta, ChunkType};
use crate::component::{generate_component_content, registry_name};
use crate::context::CompileContext;
use crate::error::{snapshot, UidlError, UidlResult};
use crate::hast::{
    add_attribute, add_child, create_comment, create_element, create_text, prepend_child, to_html,
    HastHandle, HastNode,
};
use crate::keys::collect_keys;
use crate::options::GeneratorOptions;
use crate::plugin::{ComponentPlugin, ComponentStructure, DEFAULT_TEMPLATE_CHUNK_NAME};
use crate::static_eval::ConditionSet;
use crate::uidl::{
    AttributeValue, ComponentUidl, ConditionalContent, DefaultValue, DynamicReference,
    ElementNode, Literal, PropDefinition, ReferenceType, StateDefinition, StyleMap,
    StyleReference, StyleValue, UidlNode,
};
use crate::utils::{is_absolute_url, relative_path, value_at_path, value_to_string};

pub const CONDITIONAL_PLACEHOLDER: &str = "Conditional nodes are not supported in HTML";
pub const EXPRESSION_PLACEHOLDER: &str = "Expressions are not supported in HTML";

/// Definition types a dynamic reference may point at.
const SUPPORTED_REFERENCE_TYPES: &[&str] =
    &["string", "number", "boolean", "object", "element", "array"];

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATION STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only inputs shared by every node of one page.
pub struct HtmlEnv<'a> {
    pub externals: &'a HashMap<String, ComponentUidl>,
    pub style_plugin: &'a dyn ComponentPlugin,
    pub plugins: &'a [Box<dyn ComponentPlugin>],
    pub options: &'a GeneratorOptions,
    /// Output folder of the page being generated.
    pub folder_path: &'a [String],
}

/// Prop and state definitions visible to the nodes being generated.
pub struct Scope<'a> {
    pub props: &'a BTreeMap<String, PropDefinition>,
    pub states: &'a BTreeMap<String, StateDefinition>,
    /// Component names from the page down to the current instance.
    pub hierarchy: &'a [String],
}

pub fn generate_html_syntax(
    node: &mut UidlNode,
    scope: &Scope,
    ctx: &mut CompileContext,
    env: &HtmlEnv,
) -> UidlResult<HastNode> {
    match node {
        UidlNode::Raw(raw) | UidlNode::Inject(raw) => Ok(HastNode::Raw(raw.clone())),
        UidlNode::Static(literal) => Ok(create_text(value_to_string(&literal.to_json()))),
        UidlNode::Slot(_) => Ok(HastNode::Element(create_element("slot"))),
        UidlNode::Element(element) => {
            generate_element_node(element, scope, ctx, env).map(HastNode::Element)
        }
        UidlNode::Dynamic(reference) => {
            let reference = reference.clone();
            generate_dynamic_node(&reference, scope, ctx, env)
        }
        UidlNode::Conditional(conditional) => {
            generate_conditional_node(conditional, scope, ctx, env)
        }
        UidlNode::Expr(_) => Ok(create_comment(EXPRESSION_PLACEHOLDER)),
        UidlNode::Repeat(_) => Err(UidlError::UnsupportedNode {
            node_type: node.node_type().to_string(),
            target: "html",
            snapshot: snapshot(&*node),
        }),
    }
}

fn generate_conditional_node(
    conditional: &mut ConditionalContent,
    scope: &Scope,
    ctx: &mut CompileContext,
    env: &HtmlEnv,
) -> UidlResult<HastNode> {
    let placeholder = || Ok(create_comment(CONDITIONAL_PLACEHOLDER));

    let reference = match conditional.reference.as_ref() {
        UidlNode::Dynamic(reference) if reference.reference_type == ReferenceType::Prop => {
            reference.clone()
        }
        _ => return placeholder(),
    };

    let default = match scope
        .props
        .get(&reference.id)
        .and_then(|prop| prop.default_value.as_ref())
    {
        Some(DefaultValue::Value(value)) => value,
        _ => return placeholder(),
    };

    let value = reference
        .ref_path
        .as_deref()
        .and_then(|path| value_at_path(default, path))
        .unwrap_or(default);

    match ConditionSet::from_conditional(conditional).evaluate(value) {
        Ok(true) => generate_html_syntax(&mut conditional.node, scope, ctx, env),
        Ok(false) => placeholder(),
        Err(err) => {
            tracing::debug!(prop = %reference.id, "conditional left unresolved: {}", err);
            placeholder()
        }
    }
}

pub(crate) fn generate_element_node(
    element: &mut ElementNode,
    scope: &Scope,
    ctx: &mut CompileContext,
    env: &HtmlEnv,
) -> UidlResult<HastHandle> {
    if element.is_local_component() {
        let tag = generate_component_content(element, scope, ctx, env)?;
        let semantic = element
            .semantic_type
            .clone()
            .or_else(|| element.name.clone())
            .unwrap_or_default();
        prepend_child(&tag, create_comment(format!("{} component", semantic)));
        return Ok(tag);
    }

    if let Some(dependency) = &element.dependency {
        let name = element.name.as_deref().unwrap_or(&element.element_type);
        ctx.add_dependency(name, dependency.clone());
    }

    let tag = create_element(&element.element_type);
    for child in element.children.iter_mut() {
        let child_tag = generate_html_syntax(child, scope, ctx, env)?;
        add_child(&tag, child_tag);
    }

    for reference in element.referenced_styles.values_mut() {
        if let StyleReference::Inlined { styles, .. } = &mut reference.content {
            handle_styles(styles, scope)?;
        }
    }
    handle_styles(&mut element.style, scope)?;
    handle_attributes(&element.element_type, &tag, &element.attrs, scope, env)?;

    add_node_to_lookup(&element.key, element, tag.clone(), ctx, scope.hierarchy)?;
    Ok(tag)
}

pub(crate) fn add_node_to_lookup(
    key: &str,
    element: &ElementNode,
    tag: HastHandle,
    ctx: &mut CompileContext,
    hierarchy: &[String],
) -> UidlResult<()> {
    match ctx.nodes_lookup.try_insert(key, tag) {
        Ok(()) => Ok(()),
        Err(tag) => {
            let existing = ctx
                .nodes_lookup
                .get(key)
                .map(|h| to_html(&HastNode::Element(h.clone())))
                .unwrap_or_default();
            Err(UidlError::DuplicateKey {
                key: key.to_string(),
                hierarchy: hierarchy.join(" -> "),
                snapshot: format!(
                    "Received\n{}\n{}\nExisting\n{}",
                    to_html(&HastNode::Element(tag)),
                    snapshot(element),
                    existing
                ),
            })
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REFERENCES
// ═══════════════════════════════════════════════════════════════════════════════

/// The definition a dynamic reference resolves to.
pub struct ReferencedValue<'a> {
    pub kind: &'a str,
    pub default: Option<&'a DefaultValue>,
}

pub fn get_value_from_reference<'a>(
    reference: &DynamicReference,
    scope: &Scope<'a>,
) -> UidlResult<ReferencedValue<'a>> {
    let found = match reference.reference_type {
        ReferenceType::Prop => scope
            .props
            .get(&reference.id)
            .map(|p| (p.kind.as_str(), p.default_value.as_ref()))
            .ok_or_else(|| UidlError::MissingDefinition {
                id: reference.id.clone(),
                scope: "prop",
            })?,
        ReferenceType::State => scope
            .states
            .get(&reference.id)
            .map(|s| (s.kind.as_str(), s.default_value.as_ref()))
            .ok_or_else(|| UidlError::MissingDefinition {
                id: reference.id.clone(),
                scope: "state",
            })?,
        other => {
            return Err(UidlError::UnsupportedReference {
                id: reference.id.clone(),
                reason: format!("{:?} references cannot be resolved in html", other),
                snapshot: snapshot(reference),
            })
        }
    };

    let (kind, default) = found;
    if !SUPPORTED_REFERENCE_TYPES.contains(&kind) {
        return Err(UidlError::UnsupportedReference {
            id: reference.id.clone(),
            reason: format!("dynamic value has unsupported type {}", kind),
            snapshot: snapshot(reference),
        });
    }
    if kind != "element" && default.is_none() {
        return Err(UidlError::MissingDefaultValue {
            id: reference.id.clone(),
            kind: kind.to_string(),
        });
    }
    Ok(ReferencedValue { kind, default })
}

/// Applies `ref_path` to object and array defaults; any other value is returned as is.
pub fn extract_default_value(default: &Value, ref_path: Option<&[String]>) -> Value {
    match (default, ref_path) {
        (Value::Object(_) | Value::Array(_), Some(path)) if !path.is_empty() => {
            value_at_path(default, path).cloned().unwrap_or(Value::Null)
        }
        _ => default.clone(),
    }
}

fn default_as_value(default: Option<&DefaultValue>) -> Value {
    default
        .and_then(DefaultValue::as_value)
        .cloned()
        .unwrap_or(Value::Null)
}

fn generate_dynamic_node(
    reference: &DynamicReference,
    scope: &Scope,
    ctx: &mut CompileContext,
    env: &HtmlEnv,
) -> UidlResult<HastNode> {
    if reference.reference_type == ReferenceType::Locale {
        let span = create_element("span");
        add_child(&span, create_comment(format!("Content for locale {}", reference.id)));
        return Ok(HastNode::Element(span));
    }

    let referenced = get_value_from_reference(reference, scope)?;
    match referenced.kind {
        "object" | "array" => {
            let value = default_as_value(referenced.default);
            let extracted = extract_default_value(&value, reference.ref_path.as_deref());
            Ok(create_text(value_to_string(&extracted)))
        }
        "element" => match referenced.default {
            Some(DefaultValue::Node(node)) => {
                if let Some(existing) = node
                    .as_element()
                    .and_then(|el| ctx.nodes_lookup.get(&el.key))
                {
                    return Ok(HastNode::Element(existing.clone()));
                }
                let mut node = node.as_ref().clone();
                generate_html_syntax(&mut node, scope, ctx, env)
            }
            _ => {
                let span = create_element("span");
                add_child(&span, create_comment(format!("Content for slot {}", reference.id)));
                Ok(HastNode::Element(span))
            }
        },
        _ => {
            let span = create_element("span");
            add_child(&span, create_text(value_to_string(&default_as_value(referenced.default))));
            Ok(HastNode::Element(span))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STYLES & ATTRIBUTES
// ═══════════════════════════════════════════════════════════════════════════════

/// Replaces dynamic style values bound to string or number definitions with their defaults.
pub fn handle_styles(styles: &mut StyleMap, scope: &Scope) -> UidlResult<()> {
    for value in styles.values_mut() {
        let reference = match value {
            StyleValue::Dynamic(reference) if reference.reference_type != ReferenceType::Token => {
                reference.clone()
            }
            _ => continue,
        };
        let referenced = get_value_from_reference(&reference, scope)?;
        if referenced.kind == "string" || referenced.kind == "number" {
            let resolved = extract_default_value(
                &default_as_value(referenced.default),
                reference.ref_path.as_deref(),
            );
            *value = StyleValue::Static(Literal::Str(value_to_string(&resolved)));
        }
    }
    Ok(())
}

/// Rewrites a local link against the route table, relative to the page's folder.
pub fn resolve_local_link(href: &str, env: &HtmlEnv) -> String {
    let route = env
        .options
        .routes()
        .iter()
        .find(|route| route.page_options.nav_link.as_deref() == Some(href));

    let target = match route.and_then(|r| r.page_options.nav_link.as_deref()) {
        Some(nav_link) => nav_link,
        None if href == "/home" => "/",
        None => href,
    };
    let target = if target == "/" { "index" } else { target };

    let from = format!("/{}", env.folder_path.join("/"));
    let to = format!("/{}", target.trim_start_matches('/'));
    let relative = relative_path(&from, &to);
    if relative.is_empty() {
        let last = to.rsplit('/').next().unwrap_or_default();
        return format!("{}.html", last);
    }
    format!("{}.html", relative)
}

fn prefix_with_folder_depth(path: &str, depth: usize) -> String {
    if depth == 0 {
        return path.to_string();
    }
    format!("{}{}", "../".repeat(depth), path.trim_start_matches('/'))
}

pub fn handle_attributes(
    element_type: &str,
    tag: &HastHandle,
    attrs: &BTreeMap<String, AttributeValue>,
    scope: &Scope,
    env: &HtmlEnv,
) -> UidlResult<()> {
    for (name, value) in attrs {
        match value {
            AttributeValue::Static(Literal::Str(text))
                if name == "href" && text.starts_with('/') =>
            {
                add_attribute(tag, name, resolve_local_link(text, env));
            }
            AttributeValue::Static(Literal::Bool(flag)) => {
                add_attribute(tag, name, if *flag { "true" } else { "false" });
            }
            AttributeValue::Static(literal) => {
                let mut text = value_to_string(&literal.to_json());
                if element_type == "img" && name == "src" && !is_absolute_url(&text) {
                    text = prefix_with_folder_depth(&text, env.folder_path.len());
                }
                add_attribute(tag, name, text);
            }
            AttributeValue::Dynamic(reference) => {
                let referenced = get_value_from_reference(reference, scope)?;
                let resolved = extract_default_value(
                    &default_as_value(referenced.default),
                    reference.ref_path.as_deref(),
                );
                add_attribute(tag, name, value_to_string(&resolved));
            }
            AttributeValue::Raw(raw) => add_attribute(tag, name, raw.clone()),
            AttributeValue::Element(_)
            | AttributeValue::Import(_)
            | AttributeValue::Expr(_)
            | AttributeValue::Object(_) => {}
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════════════

/// Generates the `html-template` chunk of a page, inlining local components from `externals`.
pub struct HtmlTemplatePlugin {
    externals: HashMap<String, ComponentUidl>,
    style_plugin: Box<dyn ComponentPlugin>,
    plugins: Vec<Box<dyn ComponentPlugin>>,
}

impl HtmlTemplatePlugin {
    /// `style_plugin` runs once per inlined instance, scoped to that instance.
    pub fn new(style_plugin: Box<dyn ComponentPlugin>) -> Self {
        Self {
            externals: HashMap::new(),
            style_plugin,
            plugins: Vec::new(),
        }
    }

    pub fn add_external(&mut self, component: ComponentUidl) {
        self.externals.insert(registry_name(&component.name), component);
    }

    pub fn externals(&self) -> &HashMap<String, ComponentUidl> {
        &self.externals
    }

    /// Extra plugins run after the style plugin for every inlined instance.
    pub fn add_sub_component_plugin(&mut self, plugin: Box<dyn ComponentPlugin>) {
        self.plugins.push(plugin);
    }
}

impl ComponentPlugin for HtmlTemplatePlugin {
    fn name(&self) -> &str {
        "html-base-component"
    }

    fn run(&self, mut structure: ComponentStructure) -> UidlResult<ComponentStructure> {
        let ComponentStructure {
            uidl,
            options,
            context,
        } = &mut structure;

        context.reserved_keys.extend(collect_keys(&uidl.node));
        let folder_path = uidl.folder_path().to_vec();
        let hierarchy = vec![uidl.name.clone()];

        let env = HtmlEnv {
            externals: &self.externals,
            style_plugin: self.style_plugin.as_ref(),
            plugins: &self.plugins,
            options,
            folder_path: &folder_path,
        };
        let scope = Scope {
            props: &uidl.prop_definitions,
            states: &uidl.state_definitions,
            hierarchy: &hierarchy,
        };

        let root = generate_html_syntax(&mut uidl.node, &scope, context, &env)?;
        let meta = ChunkMeta {
            nodes_lookup: Some(context.nodes_lookup.clone()),
        };
        context.push_chunk(
            ChunkDefinition::new(
                DEFAULT_TEMPLATE_CHUNK_NAME,
                ChunkType::Hast,
                file_type::HTML,
                ChunkContent::Hast(root),
            )
            .with_meta(meta),
        );

        Ok(structure)
    }
}
