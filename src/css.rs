//! Stylesheet generation
//!
//! Every element with styles gets a class named after its key. Base declarations come first,
//! element-state variants follow their element, and screen-size variants are grouped at the
//! end of the sheet by descending `max-width`.

use serde_json::Value;

use crate::chunk::{file_type, ChunkContent, ChunkDefinition, ChunkType};
use crate::error::{UidlError, UidlResult};
use crate::plugin::{ComponentPlugin, ComponentStructure, DEFAULT_TEMPLATE_CHUNK_NAME};
use crate::uidl::{
    DefaultValue, ElementNode, ReferenceType, StyleCondition, StyleMap, StyleReference,
    StyleSetCondition, StyleSetDefinition, StyleValue,
};
use crate::utils::{camel_case_to_dash_case, value_to_string};
use crate::visitor::for_each_element;

type Declarations = Vec<(String, String)>;

fn declarations(styles: &StyleMap) -> Declarations {
    styles
        .iter()
        .filter_map(|(property, value)| {
            let value = match value {
                StyleValue::Static(literal) => value_to_string(&literal.to_json()),
                StyleValue::Dynamic(reference)
                    if reference.reference_type == ReferenceType::Token =>
                {
                    format!("var(--{})", camel_case_to_dash_case(&reference.id))
                }
                StyleValue::Dynamic(_) => return None,
            };
            Some((camel_case_to_dash_case(property), value))
        })
        .collect()
}

fn rule(selector: &str, declarations: &Declarations, indent: &str) -> String {
    let mut out = format!("{}{} {{\n", indent, selector);
    for (property, value) in declarations {
        out.push_str(&format!("{}  {}: {};\n", indent, property, value));
    }
    out.push_str(indent);
    out.push('}');
    out
}

fn style_set_class(definition: &StyleSetDefinition) -> String {
    let name = if definition.name.is_empty() {
        &definition.id
    } else {
        &definition.name
    };
    camel_case_to_dash_case(name)
}

#[derive(Debug, Default)]
struct StyleSheet {
    rules: Vec<String>,
    media: Vec<(f64, Vec<String>)>,
}

impl StyleSheet {
    fn push_media(&mut self, max_width: f64, selector: &str, declarations: &Declarations) {
        let rendered = rule(selector, declarations, "  ");
        match self.media.iter_mut().find(|(width, _)| *width == max_width) {
            Some((_, rules)) => rules.push(rendered),
            None => self.media.push((max_width, vec![rendered])),
        }
    }

    fn add_style_set(&mut self, definition: &StyleSetDefinition) {
        let selector = format!(".{}", style_set_class(definition));
        let base = declarations(&definition.content);
        if !base.is_empty() {
            self.rules.push(rule(&selector, &base, ""));
        }
        for condition in &definition.conditions {
            match condition {
                StyleSetCondition::ElementState { meta, content } => {
                    let decls = declarations(content);
                    if !decls.is_empty() {
                        self.rules
                            .push(rule(&format!("{}:{}", selector, meta.state), &decls, ""));
                    }
                }
                StyleSetCondition::ScreenSize { meta, content } => {
                    let decls = declarations(content);
                    if !decls.is_empty() {
                        self.push_media(meta.max_width, &selector, &decls);
                    }
                }
            }
        }
    }

    fn render(mut self) -> String {
        self.media
            .sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let mut parts = self.rules;
        for (width, rules) in self.media {
            parts.push(format!(
                "@media(max-width: {}px) {{\n{}\n}}",
                value_to_string(&Value::from(width)),
                rules.join("\n")
            ));
        }
        parts.join("\n")
    }
}

/// Emits the component's stylesheet and tags the generated elements with their classes.
#[derive(Debug, Clone)]
pub struct CssPlugin {
    template_chunk_name: String,
    chunk_name: Option<String>,
}

impl Default for CssPlugin {
    fn default() -> Self {
        Self {
            template_chunk_name: DEFAULT_TEMPLATE_CHUNK_NAME.to_string(),
            chunk_name: None,
        }
    }
}

impl CssPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the emitted chunk. Defaults to the component name.
    pub fn with_chunk_name(mut self, name: &str) -> Self {
        self.chunk_name = Some(name.to_string());
        self
    }

    pub fn with_template_chunk_name(mut self, name: &str) -> Self {
        self.template_chunk_name = name.to_string();
        self
    }
}

impl ComponentPlugin for CssPlugin {
    fn name(&self) -> &str {
        "css"
    }

    fn run(&self, mut structure: ComponentStructure) -> UidlResult<ComponentStructure> {
        let lookup = structure
            .find_chunk(&self.template_chunk_name, ChunkType::Hast)
            .ok_or_else(|| UidlError::MissingChunk {
                name: self.template_chunk_name.clone(),
            })?
            .meta
            .nodes_lookup
            .clone()
            .unwrap_or_default();

        let uidl = &structure.uidl;
        let mut sheet = StyleSheet::default();

        let mut visit = |element: &ElementNode| {
            let selector = format!(".{}", element.key);
            let mut base = declarations(&element.style);
            let mut variants = Vec::new();
            let mut classes = Vec::new();

            for reference in element.referenced_styles.values() {
                match &reference.content {
                    StyleReference::Inlined { conditions, styles } => {
                        let decls = declarations(styles);
                        if decls.is_empty() {
                            continue;
                        }
                        if conditions.is_empty() {
                            base.extend(decls);
                            continue;
                        }
                        let states: String = conditions
                            .iter()
                            .filter_map(|c| match c {
                                StyleCondition::ElementState { content } => {
                                    Some(format!(":{}", content))
                                }
                                StyleCondition::ScreenSize { .. } => None,
                            })
                            .collect();
                        let max_width = conditions.iter().find_map(|c| match c {
                            StyleCondition::ScreenSize { meta } => Some(meta.max_width),
                            StyleCondition::ElementState { .. } => None,
                        });
                        variants.push((format!("{}{}", selector, states), max_width, decls));
                    }
                    StyleReference::ProjectReferenced { reference_id } => {
                        classes.push(camel_case_to_dash_case(reference_id));
                    }
                    StyleReference::ComponentReferenced { reference_id } => {
                        let class = uidl
                            .style_set_definitions
                            .get(reference_id)
                            .map(style_set_class)
                            .unwrap_or_else(|| camel_case_to_dash_case(reference_id));
                        classes.push(class);
                    }
                }
            }

            let styled = !base.is_empty() || !variants.is_empty();
            if !base.is_empty() {
                sheet.rules.push(rule(&selector, &base, ""));
            }
            for (variant_selector, max_width, decls) in &variants {
                match max_width {
                    Some(width) => sheet.push_media(*width, variant_selector, decls),
                    None => sheet.rules.push(rule(variant_selector, decls, "")),
                }
            }

            if let Some(handle) = lookup.get(&element.key) {
                let mut tag = handle.borrow_mut();
                if styled {
                    tag.add_class(&element.key);
                }
                for class in &classes {
                    tag.add_class(class);
                }
            }
        };

        for_each_element(&uidl.node, &mut visit);
        for prop in uidl.prop_definitions.values() {
            if let Some(DefaultValue::Node(node)) = &prop.default_value {
                for_each_element(node, &mut visit);
            }
        }
        for definition in uidl.style_set_definitions.values() {
            sheet.add_style_set(definition);
        }

        let css = sheet.render();
        if !css.is_empty() {
            let name = self
                .chunk_name
                .clone()
                .unwrap_or_else(|| uidl.name.clone());
            structure.context.push_chunk(ChunkDefinition::new(
                &name,
                ChunkType::String,
                file_type::CSS,
                ChunkContent::Text(css),
            ));
        }

        Ok(structure)
    }
}
