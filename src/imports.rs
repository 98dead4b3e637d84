use std::collections::BTreeMap;

use crate::chunk::{file_type, ChunkContent, ChunkDefinition, ChunkType};
use crate::error::UidlResult;
use crate::js::import_declaration;
use crate::plugin::{ComponentPlugin, ComponentStructure};
use crate::uidl::{Dependency, DependencyType};

pub const IMPORT_LIBS_CHUNK_NAME: &str = "import-lib";
pub const IMPORT_PACKAGES_CHUNK_NAME: &str = "import-pack";
pub const IMPORT_LOCALS_CHUNK_NAME: &str = "import-local";

#[derive(Debug, Default)]
struct ImportGroup {
    default: Option<String>,
    named: Vec<String>,
}

/// Emits one `ast` chunk of import declarations per dependency kind: libraries, then
/// packages, then local components.
#[derive(Debug, Clone, Default)]
pub struct ImportStatementsPlugin;

fn import_path(dependency: &Dependency, local_prefix: Option<&str>) -> String {
    if let Some(alias) = dependency
        .meta
        .as_ref()
        .and_then(|meta| meta.import_alias.as_deref())
    {
        return alias.to_string();
    }
    match (dependency.kind, local_prefix) {
        (DependencyType::Local, Some(prefix)) => {
            format!("{}/{}", prefix.trim_end_matches('/'), dependency.path.trim_start_matches("./"))
        }
        _ => dependency.path.clone(),
    }
}

fn declarations(
    dependencies: &BTreeMap<String, Dependency>,
    kind: DependencyType,
    local_prefix: Option<&str>,
) -> Vec<ChunkContent> {
    let mut groups: BTreeMap<String, ImportGroup> = BTreeMap::new();
    for (name, dependency) in dependencies.iter().filter(|(_, d)| d.kind == kind) {
        let group = groups.entry(import_path(dependency, local_prefix)).or_default();
        match &dependency.meta {
            Some(meta) if meta.named_import => {
                let specifier = match meta.original_name.as_deref() {
                    Some(original) if original != name => format!("{} as {}", original, name),
                    _ => name.clone(),
                };
                if !group.named.contains(&specifier) {
                    group.named.push(specifier);
                }
            }
            _ => group.default = Some(name.clone()),
        }
    }

    groups
        .into_iter()
        .map(|(path, group)| {
            ChunkContent::Ast(import_declaration(group.default.as_deref(), &group.named, &path))
        })
        .collect()
}

impl ComponentPlugin for ImportStatementsPlugin {
    fn name(&self) -> &str {
        "import-statements"
    }

    fn run(&self, mut structure: ComponentStructure) -> UidlResult<ComponentStructure> {
        let mut dependencies = structure.uidl.import_definitions.clone();
        dependencies.extend(structure.context.dependencies.clone());
        let local_prefix = structure.options.local_dependencies_prefix.clone();

        let groups = [
            (IMPORT_LIBS_CHUNK_NAME, DependencyType::Library, &[][..]),
            (
                IMPORT_PACKAGES_CHUNK_NAME,
                DependencyType::Package,
                &[IMPORT_LIBS_CHUNK_NAME][..],
            ),
            (
                IMPORT_LOCALS_CHUNK_NAME,
                DependencyType::Local,
                &[IMPORT_LIBS_CHUNK_NAME, IMPORT_PACKAGES_CHUNK_NAME][..],
            ),
        ];

        for (chunk_name, kind, after) in groups {
            let parts = declarations(&dependencies, kind, local_prefix.as_deref());
            if parts.is_empty() {
                continue;
            }
            structure.context.push_chunk(
                ChunkDefinition::new(
                    chunk_name,
                    ChunkType::Ast,
                    file_type::JS,
                    ChunkContent::Many(parts),
                )
                .link_after(after),
            );
        }

        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{component_uidl, local_dependency, static_node};
    use crate::options::GeneratorOptions;
    use crate::uidl::DependencyMeta;

    fn library(path: &str, meta: Option<DependencyMeta>) -> Dependency {
        Dependency {
            kind: DependencyType::Library,
            path: path.into(),
            version: None,
            meta,
        }
    }

    #[test]
    fn test_imports_grouped_by_path_and_kind() {
        let mut structure = ComponentStructure::new(
            component_uidl("Card", static_node("x")),
            GeneratorOptions::default(),
        );
        structure.context.add_dependency("React", library("react", None));
        structure.context.add_dependency(
            "useState",
            library(
                "react",
                Some(DependencyMeta {
                    named_import: true,
                    ..Default::default()
                }),
            ),
        );
        structure.context.add_dependency("Button", local_dependency("Button"));

        let result = ImportStatementsPlugin.run(structure).unwrap();
        let names: Vec<_> = result.chunks().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![IMPORT_LIBS_CHUNK_NAME, IMPORT_LOCALS_CHUNK_NAME]);

        let libs = &result.chunks()[0];
        assert_eq!(
            libs.content,
            ChunkContent::Many(vec![ChunkContent::Ast(
                "import React, { useState } from 'react'".into()
            )])
        );
        assert_eq!(
            result.chunks()[1].link_after,
            vec![IMPORT_LIBS_CHUNK_NAME.to_string(), IMPORT_PACKAGES_CHUNK_NAME.to_string()]
        );
    }

    #[test]
    fn test_local_prefix_and_alias() {
        let dependency = local_dependency("HeroBanner");
        assert_eq!(import_path(&dependency, Some("../components/")), "../components/hero-banner");

        let aliased = library(
            "antd",
            Some(DependencyMeta {
                import_alias: Some("antd/es/button".into()),
                ..Default::default()
            }),
        );
        assert_eq!(import_path(&aliased, None), "antd/es/button");
    }
}
