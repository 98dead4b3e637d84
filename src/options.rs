use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::UidlResult;
use crate::mapping::Mapping;

/// Options for one component-generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    #[serde(default)]
    pub assets: AssetsDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_route_definition: Option<RouteDefinitions>,
    /// Merged on top of the generator's own mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_dependencies_prefix: Option<String>,
    #[serde(default)]
    pub use_file_name_for_navigation: bool,
}

impl GeneratorOptions {
    pub fn from_json(json: &str) -> UidlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn routes(&self) -> &[RouteValue] {
        self.project_route_definition
            .as_ref()
            .map(|r| r.values.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Only paths whose first segment equals the identifier are treated as assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDefinitions {
    #[serde(default)]
    pub values: Vec<RouteValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteValue {
    pub value: String,
    #[serde(default)]
    pub page_options: PageOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOptions {
    /// The path links use, e.g. `/about`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
}
