//! Chunk linker
//!
//! Chunks declare the names of chunks that must be emitted before them (`link_after`). The
//! linker repeatedly emits the first pending chunk with no outstanding dependency. A batch in
//! which no chunk is ready contains a cycle: linking stops and yields an empty string.

use std::collections::{HashMap, HashSet};

use crate::chunk::{ChunkContent, ChunkDefinition, ChunkType};
use crate::error::{UidlError, UidlResult};
use crate::hast::to_html;
use crate::js::render_js;

pub trait ChunkGenerator: Send + Sync {
    fn generate(&self, content: &ChunkContent) -> UidlResult<String>;
}

pub struct AstGenerator;

impl ChunkGenerator for AstGenerator {
    fn generate(&self, content: &ChunkContent) -> UidlResult<String> {
        Ok(match content {
            ChunkContent::Ast(source) | ChunkContent::Text(source) => render_js(source),
            ChunkContent::Hast(node) => to_html(node),
            ChunkContent::Many(_) | ChunkContent::Empty => String::new(),
        })
    }
}

pub struct HastGenerator;

impl ChunkGenerator for HastGenerator {
    fn generate(&self, content: &ChunkContent) -> UidlResult<String> {
        Ok(match content {
            ChunkContent::Hast(node) => to_html(node),
            ChunkContent::Ast(text) | ChunkContent::Text(text) => text.clone(),
            ChunkContent::Many(_) | ChunkContent::Empty => String::new(),
        })
    }
}

pub struct StringGenerator;

impl ChunkGenerator for StringGenerator {
    fn generate(&self, content: &ChunkContent) -> UidlResult<String> {
        Ok(match content {
            ChunkContent::Ast(text) | ChunkContent::Text(text) => text.clone(),
            ChunkContent::Hast(node) => to_html(node),
            ChunkContent::Many(_) | ChunkContent::Empty => String::new(),
        })
    }
}

pub struct Linker {
    generators: HashMap<ChunkType, Box<dyn ChunkGenerator>>,
}

impl Default for Linker {
    fn default() -> Self {
        let mut linker = Self::empty();
        linker.register(ChunkType::Ast, Box::new(AstGenerator));
        linker.register(ChunkType::Hast, Box::new(HastGenerator));
        linker.register(ChunkType::String, Box::new(StringGenerator));
        linker
    }
}

impl Linker {
    /// A linker with no generators registered.
    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    pub fn register(&mut self, chunk_type: ChunkType, generator: Box<dyn ChunkGenerator>) {
        self.generators.insert(chunk_type, generator);
    }

    pub fn generate_by_type(
        &self,
        chunk_type: ChunkType,
        content: &ChunkContent,
    ) -> UidlResult<String> {
        if content.is_empty() {
            return Ok(String::new());
        }
        let generator =
            self.generators
                .get(&chunk_type)
                .ok_or_else(|| UidlError::UnknownChunkType {
                    chunk_type: chunk_type.as_str().to_string(),
                })?;

        match content {
            ChunkContent::Many(parts) => {
                let rendered = parts
                    .iter()
                    .map(|part| self.generate_by_type(chunk_type, part))
                    .collect::<UidlResult<Vec<_>>>()?;
                Ok(rendered.join("\n"))
            }
            single => generator.generate(single),
        }
    }

    pub fn link(&self, chunks: &[ChunkDefinition]) -> UidlResult<String> {
        let names: HashSet<&str> = chunks.iter().map(|c| c.name.as_str()).collect();
        let mut pending: Vec<(&ChunkDefinition, Vec<String>)> = chunks
            .iter()
            .map(|chunk| {
                let deps = chunk
                    .link_after
                    .iter()
                    .filter(|dep| names.contains(dep.as_str()))
                    .cloned()
                    .collect();
                (chunk, deps)
            })
            .collect();

        let mut parts = Vec::new();
        while !pending.is_empty() {
            let Some(index) = pending.iter().position(|(_, deps)| deps.is_empty()) else {
                tracing::info!("Operation aborted. Reason: cyclic dependency between chunks.");
                return Ok(String::new());
            };

            let (chunk, _) = pending.remove(index);
            let compiled = self.generate_by_type(chunk.chunk_type, &chunk.content)?;
            if !compiled.is_empty() {
                parts.push(format!("{}\n", compiled));
            }

            for (_, deps) in pending.iter_mut() {
                deps.retain(|dep| dep != &chunk.name);
            }
        }

        Ok(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::file_type;

    fn text_chunk(name: &str, text: &str, after: &[&str]) -> ChunkDefinition {
        ChunkDefinition::new(
            name,
            ChunkType::String,
            file_type::JS,
            ChunkContent::Text(text.to_string()),
        )
        .link_after(after)
    }

    #[test]
    fn test_link_respects_order_constraints() {
        let chunks = vec![
            text_chunk("component", "C", &["imports", "helpers"]),
            text_chunk("helpers", "H", &["imports"]),
            text_chunk("imports", "I", &[]),
        ];
        let linked = Linker::default().link(&chunks).unwrap();
        assert_eq!(linked, "I\n\nH\n\nC\n");
    }

    #[test]
    fn test_cycle_links_to_empty_string() {
        let chunks = vec![text_chunk("a", "A", &["b"]), text_chunk("b", "B", &["a"])];
        assert_eq!(Linker::default().link(&chunks).unwrap(), "");
    }

    #[test]
    fn test_unknown_link_after_is_dropped() {
        let chunks = vec![text_chunk("a", "A", &["import-lib"])];
        assert_eq!(Linker::default().link(&chunks).unwrap(), "A\n");
    }

    #[test]
    fn test_empty_chunks_are_skipped() {
        let chunks = vec![
            text_chunk("a", "A", &[]),
            text_chunk("empty", "", &[]),
            text_chunk("b", "B", &["empty"]),
        ];
        assert_eq!(Linker::default().link(&chunks).unwrap(), "A\n\nB\n");
    }

    #[test]
    fn test_many_content_joined_with_newline() {
        let chunk = ChunkDefinition::new(
            "parts",
            ChunkType::String,
            file_type::CSS,
            ChunkContent::Many(vec![
                ChunkContent::Text(".a {}".into()),
                ChunkContent::Text(".b {}".into()),
            ]),
        );
        assert_eq!(Linker::default().link(&[chunk]).unwrap(), ".a {}\n.b {}\n");
    }

    #[test]
    fn test_unregistered_type_is_fatal() {
        let mut linker = Linker::empty();
        linker.register(ChunkType::String, Box::new(StringGenerator));
        let chunk = ChunkDefinition::new(
            "script",
            ChunkType::Ast,
            file_type::JS,
            ChunkContent::Ast("const a = 1".into()),
        );
        let err = linker.link(&[chunk]).unwrap_err();
        assert_eq!(
            err,
            UidlError::UnknownChunkType {
                chunk_type: "ast".into()
            }
        );
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(Linker::default().link(&[]).unwrap(), "");
    }
}
