//! Component generators
//!
//! A generator resolves a component, threads it through its plugins, links the resulting
//! chunks per file type and hands the code to its postprocessors.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use serde::Serialize;

use crate::chunk::{file_type, group_by_file_type, ChunkDefinition};
use crate::css::CssPlugin;
use crate::error::UidlResult;
use crate::head::HeadPlugin;
use crate::html::HtmlTemplatePlugin;
use crate::linker::Linker;
use crate::mapping::Mapping;
use crate::options::GeneratorOptions;
use crate::plugin::{run_pipeline, ComponentPlugin, ComponentStructure};
use crate::postprocess::{CodeByFileType, PostProcessor};
use crate::resolver::Resolver;
use crate::uidl::{ComponentUidl, Dependency};

/// Name of the page-level stylesheet chunk.
pub const PAGE_STYLE_CHUNK_NAME: &str = "style";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub name: String,
    pub file_type: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledComponent {
    pub files: Vec<GeneratedFile>,
    pub dependencies: BTreeMap<String, Dependency>,
}

impl CompiledComponent {
    pub fn file(&self, file_type: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.file_type == file_type)
    }
}

pub struct ComponentGenerator {
    resolver: Resolver,
    plugins: Vec<Box<dyn ComponentPlugin>>,
    postprocessors: Vec<Box<dyn PostProcessor>>,
    linker: Linker,
}

impl ComponentGenerator {
    pub fn new(mapping: Mapping) -> Self {
        Self {
            resolver: Resolver::new(mapping),
            plugins: Vec::new(),
            postprocessors: Vec::new(),
            linker: Linker::default(),
        }
    }

    pub fn add_mapping(&mut self, mapping: &Mapping) {
        self.resolver.add_mapping(mapping);
    }

    pub fn add_plugin(&mut self, plugin: Box<dyn ComponentPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn add_postprocessor(&mut self, postprocessor: Box<dyn PostProcessor>) {
        self.postprocessors.push(postprocessor);
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn resolve(
        &self,
        uidl: &ComponentUidl,
        options: &GeneratorOptions,
    ) -> UidlResult<ComponentUidl> {
        self.resolver.resolve(uidl, options)
    }

    pub fn generate_component(
        &self,
        uidl: &ComponentUidl,
        options: &GeneratorOptions,
    ) -> UidlResult<CompiledComponent> {
        self.generate_with(uidl, options, &[])
    }

    /// Runs `leading` before the generator's own plugins.
    pub(crate) fn generate_with(
        &self,
        uidl: &ComponentUidl,
        options: &GeneratorOptions,
        leading: &[&dyn ComponentPlugin],
    ) -> UidlResult<CompiledComponent> {
        let resolved = self.resolve(uidl, options)?;
        let output = resolved.output_options.clone().unwrap_or_default();

        let mut plugins: Vec<&dyn ComponentPlugin> = leading.to_vec();
        plugins.extend(self.plugins.iter().map(|p| p.as_ref()));
        let structure = run_pipeline(&plugins, ComponentStructure::new(resolved, options.clone()))?;

        let code = self.link_code_chunks(structure.chunks())?;
        let code = self
            .postprocessors
            .iter()
            .fold(code, |code, postprocessor| postprocessor.process(code));

        let default_name = structure.uidl.name.clone();
        let files = code
            .into_iter()
            .filter(|(_, content)| !content.is_empty())
            .map(|(kind, content)| {
                let name = match kind.as_str() {
                    file_type::CSS => output.style_file_name.clone(),
                    file_type::HTML => output.template_file_name.clone(),
                    _ => None,
                }
                .or_else(|| output.file_name.clone())
                .unwrap_or_else(|| default_name.clone());
                GeneratedFile {
                    name,
                    file_type: kind,
                    content,
                }
            })
            .collect();

        tracing::debug!(component = %structure.uidl.name, "generated component");
        Ok(CompiledComponent {
            files,
            dependencies: structure.context.dependencies,
        })
    }

    /// Links each file type's chunks into one string.
    pub fn link_code_chunks(&self, chunks: &[ChunkDefinition]) -> UidlResult<CodeByFileType> {
        group_by_file_type(chunks)
            .into_iter()
            .map(|(kind, group)| Ok((kind, self.linker.link(&group)?)))
            .collect()
    }

    /// Compiles independent components in parallel.
    pub fn generate_components(
        &self,
        uidls: &[ComponentUidl],
        options: &GeneratorOptions,
    ) -> Vec<UidlResult<CompiledComponent>> {
        uidls
            .par_iter()
            .map(|uidl| self.generate_component(uidl, options))
            .collect()
    }
}

/// Static HTML generator. Local components are inlined from its externals registry.
pub struct HtmlComponentGenerator {
    generator: ComponentGenerator,
    template: HtmlTemplatePlugin,
}

pub fn create_html_component_generator() -> HtmlComponentGenerator {
    let mut generator = ComponentGenerator::new(Mapping::html());
    generator.add_plugin(Box::new(CssPlugin::new().with_chunk_name(PAGE_STYLE_CHUNK_NAME)));
    generator.add_plugin(Box::new(HeadPlugin));

    HtmlComponentGenerator {
        generator,
        template: HtmlTemplatePlugin::new(Box::new(CssPlugin::new())),
    }
}

impl HtmlComponentGenerator {
    /// Resolves `components` and registers them for inlining.
    pub fn add_external_components(
        &mut self,
        components: &[ComponentUidl],
        options: &GeneratorOptions,
    ) -> UidlResult<()> {
        for component in components {
            let resolved = self.generator.resolve(component, options)?;
            self.template.add_external(resolved);
        }
        Ok(())
    }

    pub fn externals(&self) -> &HashMap<String, ComponentUidl> {
        self.template.externals()
    }

    pub fn generator_mut(&mut self) -> &mut ComponentGenerator {
        &mut self.generator
    }

    pub fn generate_component(
        &self,
        uidl: &ComponentUidl,
        options: &GeneratorOptions,
    ) -> UidlResult<CompiledComponent> {
        self.generator.generate_with(uidl, options, &[&self.template])
    }

    pub fn generate_components(
        &self,
        uidls: &[ComponentUidl],
        options: &GeneratorOptions,
    ) -> Vec<UidlResult<CompiledComponent>> {
        uidls
            .par_iter()
            .map(|uidl| self.generate_component(uidl, options))
            .collect()
    }
}
