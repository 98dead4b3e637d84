//! Style-set and referenced-style resolution.
//!
//! Conditional variants are emitted element-state first, then screen-size by descending
//! `maxWidth`, so narrower breakpoints come last and win in the cascade.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::options::AssetsDefinition;
use crate::uidl::{
    Literal, StyleCondition, StyleMap, StyleReference, StyleSetCondition, StyleSetDefinition,
    StyleValue, UidlNode,
};
use crate::utils::prefix_css_urls;
use crate::visitor::traverse_elements_mut;

fn by_descending_width(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn sort_style_set_conditions(conditions: Vec<StyleSetCondition>) -> Vec<StyleSetCondition> {
    let (mut states, mut screens): (Vec<_>, Vec<_>) = conditions
        .into_iter()
        .partition(|c| matches!(c, StyleSetCondition::ElementState { .. }));
    screens.sort_by(|a, b| match (a, b) {
        (
            StyleSetCondition::ScreenSize { meta: ma, .. },
            StyleSetCondition::ScreenSize { meta: mb, .. },
        ) => by_descending_width(ma.max_width, mb.max_width),
        _ => Ordering::Equal,
    });
    states.append(&mut screens);
    states
}

pub fn sort_style_conditions(conditions: Vec<StyleCondition>) -> Vec<StyleCondition> {
    let (mut states, mut screens): (Vec<_>, Vec<_>) = conditions
        .into_iter()
        .partition(|c| matches!(c, StyleCondition::ElementState { .. }));
    screens.sort_by(|a, b| match (a, b) {
        (StyleCondition::ScreenSize { meta: ma }, StyleCondition::ScreenSize { meta: mb }) => {
            by_descending_width(ma.max_width, mb.max_width)
        }
        _ => Ordering::Equal,
    });
    states.append(&mut screens);
    states
}

pub fn prefix_style_assets(styles: &mut StyleMap, assets: &AssetsDefinition) {
    for value in styles.values_mut() {
        if let StyleValue::Static(Literal::Str(text)) = value {
            *text = prefix_css_urls(text, assets);
        }
    }
}

pub fn resolve_style_set_definitions(
    definitions: &mut BTreeMap<String, StyleSetDefinition>,
    assets: &AssetsDefinition,
) {
    for definition in definitions.values_mut() {
        prefix_style_assets(&mut definition.content, assets);
        let conditions = std::mem::take(&mut definition.conditions);
        definition.conditions = sort_style_set_conditions(conditions);
        for condition in definition.conditions.iter_mut() {
            match condition {
                StyleSetCondition::ElementState { content, .. }
                | StyleSetCondition::ScreenSize { content, .. } => {
                    prefix_style_assets(content, assets)
                }
            }
        }
    }
}

/// Sorts inlined referenced-style conditions and prefixes asset URLs in element styles.
pub fn resolve_referenced_styles(node: &mut UidlNode, assets: &AssetsDefinition) {
    traverse_elements_mut(node, |el| {
        prefix_style_assets(&mut el.style, assets);
        for reference in el.referenced_styles.values_mut() {
            if let StyleReference::Inlined { conditions, styles } = &mut reference.content {
                *conditions = sort_style_conditions(std::mem::take(conditions));
                prefix_style_assets(styles, assets);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::style_map;
    use crate::uidl::{ElementStateMeta, ScreenSizeMeta};

    fn screen(width: f64) -> StyleSetCondition {
        StyleSetCondition::ScreenSize {
            meta: ScreenSizeMeta { max_width: width },
            content: StyleMap::new(),
        }
    }

    fn widths(conditions: &[StyleSetCondition]) -> Vec<f64> {
        conditions
            .iter()
            .filter_map(|c| match c {
                StyleSetCondition::ScreenSize { meta, .. } => Some(meta.max_width),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_screen_sizes_sorted_descending() {
        let sorted = sort_style_set_conditions(vec![screen(480.0), screen(768.0), screen(1024.0)]);
        assert_eq!(widths(&sorted), vec![1024.0, 768.0, 480.0]);
    }

    #[test]
    fn test_element_states_come_first() {
        let hover = StyleSetCondition::ElementState {
            meta: ElementStateMeta {
                state: "hover".into(),
            },
            content: StyleMap::new(),
        };
        let sorted = sort_style_set_conditions(vec![screen(480.0), hover.clone(), screen(991.0)]);
        assert_eq!(sorted[0], hover);
        assert_eq!(widths(&sorted), vec![991.0, 480.0]);
    }

    #[test]
    fn test_style_set_assets_prefixed() {
        let mut definitions = BTreeMap::new();
        definitions.insert(
            "hero".to_string(),
            StyleSetDefinition {
                id: "hero".into(),
                name: "hero".into(),
                kind: "reusable-project-style-map".into(),
                content: style_map(&[("background", "url(/img/bg.png)")]),
                conditions: vec![],
            },
        );
        let assets = AssetsDefinition {
            prefix: Some("/public".into()),
            ..Default::default()
        };
        resolve_style_set_definitions(&mut definitions, &assets);
        assert_eq!(
            definitions["hero"].content["background"],
            StyleValue::Static(Literal::Str("url(/public/img/bg.png)".into()))
        );
    }
}
