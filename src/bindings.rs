//! N-API entry points. JSON in, JSON out.

use napi_derive::napi;

use crate::generator::create_html_component_generator;
use crate::mapping::Mapping;
use crate::options::GeneratorOptions;
use crate::resolver::Resolver;
use crate::uidl::ComponentUidl;

fn to_napi(err: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(err.to_string())
}

fn parse_options(options_json: Option<String>) -> napi::Result<GeneratorOptions> {
    match options_json {
        Some(json) => GeneratorOptions::from_json(&json).map_err(to_napi),
        None => Ok(GeneratorOptions::default()),
    }
}

#[napi]
pub fn resolve_uidl_native(
    uidl_json: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let uidl = ComponentUidl::from_json(&uidl_json).map_err(to_napi)?;
    let options = parse_options(options_json)?;
    let resolved = Resolver::new(Mapping::html())
        .resolve(&uidl, &options)
        .map_err(to_napi)?;
    serde_json::to_value(resolved).map_err(to_napi)
}

#[napi]
pub fn generate_html_component_native(
    uidl_json: String,
    externals_json: Option<String>,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let uidl = ComponentUidl::from_json(&uidl_json).map_err(to_napi)?;
    let options = parse_options(options_json)?;
    let externals: Vec<ComponentUidl> = match externals_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi)?,
        None => Vec::new(),
    };

    let mut generator = create_html_component_generator();
    generator
        .add_external_components(&externals, &options)
        .map_err(to_napi)?;
    let compiled = generator.generate_component(&uidl, &options).map_err(to_napi)?;
    serde_json::to_value(compiled).map_err(to_napi)
}
