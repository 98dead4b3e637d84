//! # UIDL Compiler Core
//!
//! Compiles framework-neutral UIDL component trees into source files.
//!
//! ## Pipeline
//!
//! 1. **Resolve**: the input component is cloned and normalized against a target
//!    [`Mapping`]: element types are mapped, abilities expanded, styles sorted and every
//!    element gets a unique key. The caller's tree is never modified.
//! 2. **Generate**: an ordered list of [`ComponentPlugin`]s turns the resolved tree into
//!    chunks. For static HTML, local components are inlined at every reference.
//! 3. **Link**: chunks are ordered by their `link_after` constraints, rendered per chunk
//!    type and concatenated per file type.
//! 4. **Postprocess**: text-to-text transforms over the linked files.

#[cfg(feature = "napi")]
mod bindings;

pub mod abilities;
pub mod builders;
pub mod chunk;
pub mod component;
pub mod context;
pub mod css;
pub mod embed;
pub mod error;
pub mod generator;
pub mod hast;
pub mod head;
pub mod html;
pub mod imports;
pub mod js;
pub mod keys;
pub mod linker;
pub mod mapping;
pub mod options;
pub mod plugin;
pub mod postprocess;
pub mod resolver;
pub mod static_eval;
pub mod style_sets;
pub mod uidl;
pub mod utils;
pub mod visitor;


#[cfg(feature = "napi")]
pub use bindings::{generate_html_component_native, resolve_uidl_native};

pub use abilities::{AbilityResolver, LinkAbilityResolver};
pub use chunk::{file_type, group_by_file_type, ChunkContent, ChunkDefinition, ChunkMeta, ChunkType};
pub use context::{CompileContext, NodesLookup};
pub use css::CssPlugin;
pub use embed::parse_html_fragment;
pub use error::{UidlError, UidlResult};
pub use generator::{
    create_html_component_generator, CompiledComponent, ComponentGenerator, GeneratedFile,
    HtmlComponentGenerator,
};
pub use hast::{to_html, HastElement, HastHandle, HastNode};
pub use head::HeadPlugin;
pub use html::HtmlTemplatePlugin;
pub use imports::ImportStatementsPlugin;
pub use keys::{generate_unique_keys, ElementsLookup};
pub use linker::{ChunkGenerator, Linker};
pub use mapping::{ElementMapping, Mapping};
pub use options::{AssetsDefinition, GeneratorOptions, PageOptions, RouteDefinitions, RouteValue};
pub use plugin::{run_pipeline, ComponentPlugin, ComponentStructure, DEFAULT_TEMPLATE_CHUNK_NAME};
pub use postprocess::{CodeByFileType, PostProcessor, VueFilePostProcessor};
pub use resolver::Resolver;
pub use static_eval::{ConditionSet, EvalError};
pub use uidl::*;
pub use visitor::UidlVisitor;
