use std::collections::BTreeMap;

use crate::chunk::file_type;

/// Linked code keyed by file type.
pub type CodeByFileType = BTreeMap<String, String>;

/// Transforms linked code before it becomes files.
pub trait PostProcessor: Send + Sync {
    fn process(&self, code: CodeByFileType) -> CodeByFileType;
}

impl<F> PostProcessor for F
where
    F: Fn(CodeByFileType) -> CodeByFileType + Send + Sync,
{
    fn process(&self, code: CodeByFileType) -> CodeByFileType {
        self(code)
    }
}

/// Merges html, js and css output into a single `vue` entry.
#[derive(Debug, Clone, Default)]
pub struct VueFilePostProcessor;

impl PostProcessor for VueFilePostProcessor {
    fn process(&self, mut code: CodeByFileType) -> CodeByFileType {
        let template = code.remove(file_type::HTML);
        let script = code.remove(file_type::JS);
        let style = code.remove(file_type::CSS);

        let mut sections = Vec::new();
        if let Some(template) = template {
            sections.push(format!("<template>\n{}</template>", template));
        }
        if let Some(script) = script {
            sections.push(format!("<script>\n{}</script>", script));
        }
        if let Some(style) = style {
            sections.push(format!("<style scoped>\n{}</style>", style));
        }

        if sections.is_empty() {
            tracing::warn!("no html, js or css output to merge into a vue file");
            return code;
        }
        code.insert(file_type::VUE.to_string(), sections.join("\n\n"));
        code
    }
}
