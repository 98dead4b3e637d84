use crate::chunk::{ChunkDefinition, ChunkType};
use crate::context::CompileContext;
use crate::error::UidlResult;
use crate::options::GeneratorOptions;
use crate::uidl::ComponentUidl;

/// Name of the chunk holding a component's markup.
pub const DEFAULT_TEMPLATE_CHUNK_NAME: &str = "html-template";

/// Everything a plugin reads and extends while a component is generated.
#[derive(Debug, Clone)]
pub struct ComponentStructure {
    pub uidl: ComponentUidl,
    pub options: GeneratorOptions,
    pub context: CompileContext,
}

impl ComponentStructure {
    pub fn new(uidl: ComponentUidl, options: GeneratorOptions) -> Self {
        Self {
            uidl,
            options,
            context: CompileContext::new(),
        }
    }

    pub fn chunks(&self) -> &[ChunkDefinition] {
        &self.context.chunks
    }

    /// First chunk of `chunk_type` named `name`.
    pub fn find_chunk(&self, name: &str, chunk_type: ChunkType) -> Option<&ChunkDefinition> {
        self.context
            .chunks
            .iter()
            .find(|c| c.name == name && c.chunk_type == chunk_type)
    }
}

/// One stage of component generation.
pub trait ComponentPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self, structure: ComponentStructure) -> UidlResult<ComponentStructure>;
}

/// Runs `plugins` strictly in order, threading the structure through each.
pub fn run_pipeline(
    plugins: &[&dyn ComponentPlugin],
    structure: ComponentStructure,
) -> UidlResult<ComponentStructure> {
    plugins.iter().try_fold(structure, |structure, plugin| {
        tracing::debug!(plugin = plugin.name(), "running plugin");
        plugin.run(structure)
    })
}
