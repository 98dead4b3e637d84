//! String, path and value helpers shared by the resolver and the generators.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::options::AssetsDefinition;

lazy_static! {
    static ref CAMEL_BOUNDARY_RE: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref NON_WORD_RE: Regex = Regex::new(r"[^a-zA-Z0-9]+").unwrap();
    static ref CSS_URL_RE: Regex = Regex::new(r#"url\(\s*(['"]?)([^'")]+)(['"]?)\s*\)"#).unwrap();
    static ref ABSOLUTE_URL_RE: Regex = Regex::new(r"^(?:[a-zA-Z][a-zA-Z0-9+.-]*:|//)").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMING
// ═══════════════════════════════════════════════════════════════════════════════

/// `PrimaryButton` -> `primary-button`, `card wrapper` -> `card-wrapper`.
pub fn camel_case_to_dash_case(input: &str) -> String {
    let spaced = CAMEL_BOUNDARY_RE.replace_all(input, "$1-$2");
    NON_WORD_RE
        .replace_all(&spaced, "-")
        .trim_matches('-')
        .to_lowercase()
}

/// `primary-button` -> `PrimaryButton`.
pub fn dash_case_to_upper_camel_case(input: &str) -> String {
    NON_WORD_RE
        .split(input)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Five hex characters derived from `seed`; stable across runs.
pub fn hash_suffix(seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    let digest = hasher.finalize();
    digest
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
        .chars()
        .take(5)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALUES
// ═══════════════════════════════════════════════════════════════════════════════

/// Stringifies a JSON value the way it would be interpolated into markup.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Follows `path` through nested objects and arrays.
pub fn value_at_path<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// PATHS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn is_absolute_url(value: &str) -> bool {
    ABSOLUTE_URL_RE.is_match(value)
}

/// Relative path between two absolute slash-separated paths, e.g. `/a/b` -> `/index` = `../../index`.
pub fn relative_path(from: &str, to: &str) -> String {
    let from_parts: Vec<&str> = from.split('/').filter(|p| !p.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|p| !p.is_empty()).collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = std::iter::repeat("..")
        .take(from_parts.len() - common)
        .collect();
    parts.extend(&to_parts[common..]);
    parts.join("/")
}

/// Prefixes a local asset path, honouring explicit mappings first.
pub fn prefix_asset_path(path: &str, assets: &AssetsDefinition) -> String {
    if let Some(mapped) = assets.mappings.get(path) {
        return mapped.clone();
    }
    if !path.starts_with('/') || path.starts_with("//") {
        return path.to_string();
    }
    if let Some(identifier) = assets.identifier.as_deref() {
        let first_segment = path.trim_start_matches('/').split('/').next().unwrap_or("");
        if first_segment != identifier {
            return path.to_string();
        }
    }
    match assets.prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => {
            format!("{}{}", prefix.trim_end_matches('/'), path)
        }
        _ => path.to_string(),
    }
}

/// Rewrites every `url(...)` in a CSS value through [`prefix_asset_path`].
pub fn prefix_css_urls(value: &str, assets: &AssetsDefinition) -> String {
    CSS_URL_RE
        .replace_all(value, |caps: &regex::Captures| {
            let quote = &caps[1];
            let prefixed = prefix_asset_path(&caps[2], assets);
            format!("url({}{}{})", quote, prefixed, quote)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dash_case() {
        assert_eq!(camel_case_to_dash_case("PrimaryButton"), "primary-button");
        assert_eq!(camel_case_to_dash_case("Card-wrapper"), "card-wrapper");
        assert_eq!(camel_case_to_dash_case("my card"), "my-card");
        assert_eq!(dash_case_to_upper_camel_case("primary-button"), "PrimaryButton");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("/a/b", "/index"), "../../index");
        assert_eq!(relative_path("/", "/about"), "about");
        assert_eq!(relative_path("/blog", "/blog/post"), "post");
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!(3)), "3");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(null)), "");
    }

    #[test]
    fn test_value_at_path() {
        let value = json!({"author": {"name": "Ada"}, "tags": ["a", "b"]});
        let path = vec!["author".to_string(), "name".to_string()];
        assert_eq!(value_at_path(&value, &path), Some(&json!("Ada")));
        assert_eq!(value_at_path(&value, &["tags".into(), "1".into()]), Some(&json!("b")));
        assert_eq!(value_at_path(&json!("plain"), &path), None);
    }

    #[test]
    fn test_prefix_assets() {
        let assets = AssetsDefinition {
            prefix: Some("https://cdn.example.com".into()),
            identifier: Some("static".into()),
            ..Default::default()
        };
        assert_eq!(
            prefix_asset_path("/static/logo.png", &assets),
            "https://cdn.example.com/static/logo.png"
        );
        assert_eq!(prefix_asset_path("/other/logo.png", &assets), "/other/logo.png");
        assert_eq!(
            prefix_css_urls("url('/static/bg.png') no-repeat", &assets),
            "url('https://cdn.example.com/static/bg.png') no-repeat"
        );
    }

    #[test]
    fn test_hash_suffix_is_stable() {
        assert_eq!(hash_suffix("card-wrapper"), hash_suffix("card-wrapper"));
        assert_eq!(hash_suffix("x").len(), 5);
    }
}
