use std::collections::BTreeMap;

use crate::context::NodesLookup;
use crate::hast::{HastHandle, HastNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkType {
    Ast,
    Hast,
    String,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Ast => "ast",
            ChunkType::Hast => "hast",
            ChunkType::String => "string",
        }
    }
}

pub mod file_type {
    pub const HTML: &str = "html";
    pub const CSS: &str = "css";
    pub const JS: &str = "js";
    pub const VUE: &str = "vue";
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkContent {
    Ast(String),
    Hast(HastNode),
    Text(String),
    /// Parts of the same type, rendered independently and joined with newlines.
    Many(Vec<ChunkContent>),
    Empty,
}

impl ChunkContent {
    pub fn is_empty(&self) -> bool {
        match self {
            ChunkContent::Empty => true,
            ChunkContent::Many(parts) => parts.iter().all(ChunkContent::is_empty),
            ChunkContent::Ast(s) | ChunkContent::Text(s) => s.is_empty(),
            ChunkContent::Hast(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChunkMeta {
    /// Handles to the generated elements of a template chunk, by node key.
    pub nodes_lookup: Option<NodesLookup<HastHandle>>,
}

impl PartialEq for ChunkMeta {
    fn eq(&self, other: &Self) -> bool {
        let keys = |m: &ChunkMeta| {
            m.nodes_lookup
                .as_ref()
                .map(|l| l.keys().cloned().collect::<Vec<_>>())
        };
        keys(self) == keys(other)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkDefinition {
    pub name: String,
    pub chunk_type: ChunkType,
    pub file_type: String,
    pub content: ChunkContent,
    pub link_after: Vec<String>,
    pub meta: ChunkMeta,
}

impl ChunkDefinition {
    pub fn new(name: &str, chunk_type: ChunkType, file_type: &str, content: ChunkContent) -> Self {
        Self {
            name: name.to_string(),
            chunk_type,
            file_type: file_type.to_string(),
            content,
            link_after: Vec::new(),
            meta: ChunkMeta::default(),
        }
    }

    pub fn link_after(mut self, names: &[&str]) -> Self {
        self.link_after = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_meta(mut self, meta: ChunkMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// Chunks grouped by file type, keeping the original order within each group.
pub fn group_by_file_type(chunks: &[ChunkDefinition]) -> BTreeMap<String, Vec<ChunkDefinition>> {
    let mut groups: BTreeMap<String, Vec<ChunkDefinition>> = BTreeMap::new();
    for chunk in chunks {
        groups
            .entry(chunk.file_type.clone())
            .or_default()
            .push(chunk.clone());
    }
    groups
}
