use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_ILLEGAL_NAME: &str = "UIDL001";
pub const ERR_DUPLICATE_KEY: &str = "UIDL002";
pub const ERR_MISSING_EXTERNAL: &str = "UIDL003";
pub const ERR_MISSING_DEFINITION: &str = "UIDL004";
pub const ERR_MISSING_DEFAULT: &str = "UIDL005";
pub const ERR_UNSUPPORTED_REFERENCE: &str = "UIDL006";
pub const ERR_UNSUPPORTED_NODE: &str = "UIDL007";
pub const ERR_UNSUPPORTED_ATTRIBUTE: &str = "UIDL008";
pub const ERR_DUPLICATE_DATA_SOURCE: &str = "UIDL009";
pub const ERR_UNKNOWN_CHUNK_TYPE: &str = "UIDL010";
pub const ERR_MISSING_CHUNK: &str = "UIDL011";
pub const ERR_JSON: &str = "UIDL012";

pub type UidlResult<T> = Result<T, UidlError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UidlError {
    #[error("Illegal {kind} name '{name}' in component '{component}'")]
    IllegalName {
        component: String,
        kind: &'static str,
        name: String,
    },

    /// `snapshot` holds the JSON of the node already registered and the one being added.
    #[error("Duplicate key '{key}' found in nodes lookup. Hierarchy: {hierarchy}\n{snapshot}")]
    DuplicateKey {
        key: String,
        hierarchy: String,
        snapshot: String,
    },

    #[error("{name} is missing from externals")]
    MissingExternal { name: String },

    #[error("Definition for {id} is missing from {scope} definitions")]
    MissingDefinition { id: String, scope: &'static str },

    #[error("Default value is missing for {id} of type {kind}")]
    MissingDefaultValue { id: String, kind: String },

    #[error("Reference '{id}' is not supported here: {reason}\n{snapshot}")]
    UnsupportedReference {
        id: String,
        reason: String,
        snapshot: String,
    },

    #[error("Node of type '{node_type}' is not supported by the {target} target\n{snapshot}")]
    UnsupportedNode {
        node_type: String,
        target: &'static str,
        snapshot: String,
    },

    #[error("Attribute '{name}' is not supported: {reason}")]
    UnsupportedAttribute { name: String, reason: String },

    #[error("Data source '{identifier}' is used by more than one repeat node in '{component}'")]
    DuplicateDataSource {
        component: String,
        identifier: String,
    },

    #[error("Attempted to generate unknown type {chunk_type}")]
    UnknownChunkType { chunk_type: String },

    #[error("Chunk '{name}' is required but was not produced")]
    MissingChunk { name: String },

    #[error("JSON error: {0}")]
    Json(String),
}

impl UidlError {
    pub fn code(&self) -> &'static str {
        match self {
            UidlError::IllegalName { .. } => ERR_ILLEGAL_NAME,
            UidlError::DuplicateKey { .. } => ERR_DUPLICATE_KEY,
            UidlError::MissingExternal { .. } => ERR_MISSING_EXTERNAL,
            UidlError::MissingDefinition { .. } => ERR_MISSING_DEFINITION,
            UidlError::MissingDefaultValue { .. } => ERR_MISSING_DEFAULT,
            UidlError::UnsupportedReference { .. } => ERR_UNSUPPORTED_REFERENCE,
            UidlError::UnsupportedNode { .. } => ERR_UNSUPPORTED_NODE,
            UidlError::UnsupportedAttribute { .. } => ERR_UNSUPPORTED_ATTRIBUTE,
            UidlError::DuplicateDataSource { .. } => ERR_DUPLICATE_DATA_SOURCE,
            UidlError::UnknownChunkType { .. } => ERR_UNKNOWN_CHUNK_TYPE,
            UidlError::MissingChunk { .. } => ERR_MISSING_CHUNK,
            UidlError::Json(_) => ERR_JSON,
        }
    }

    /// Configuration errors come from how the generator was assembled, not from the input tree.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            UidlError::UnknownChunkType { .. } | UidlError::MissingChunk { .. }
        )
    }
}

impl From<serde_json::Error> for UidlError {
    fn from(err: serde_json::Error) -> Self {
        UidlError::Json(err.to_string())
    }
}

/// Pretty JSON of any serializable value, used for error snapshots.
pub(crate) fn snapshot<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
