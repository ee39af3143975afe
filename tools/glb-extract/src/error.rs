//! Error types for GLB export

use std::path::PathBuf;

/// Result type for export operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that abort an export
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Output path is already occupied; existing files are never overwritten
    #[error("output file already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// Mesh has no vertices
    #[error("mesh must have at least one vertex")]
    EmptyMesh,

    /// Attribute component count outside 1-4
    #[error("attribute '{alias}' has {components} components (must be 1-4)")]
    UnsupportedAttributeShape { alias: String, components: u8 },

    /// Attribute layout does not fit inside the vertex stride
    #[error("attributes need {layout} bytes per vertex but the stride is {stride}")]
    StrideTooSmall { layout: usize, stride: usize },

    /// Position component is NaN or infinite, so no valid bounds exist
    #[error("attribute '{alias}' has a non-finite value at vertex {vertex}, component {component}")]
    NonFiniteComponent {
        alias: String,
        vertex: usize,
        component: usize,
    },

    /// Raw byte view disagrees with the declared counts
    #[error("{what} buffer is {actual} bytes, expected {expected}")]
    BufferSizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Modified UTF-8 encoding does not fit the 16-bit length prefix
    #[error("encoded string too long ({0} bytes, max 65535)")]
    TextTooLong(usize),

    /// Container length does not fit the 32-bit GLB length fields
    #[error("GLB container would be {0} bytes (max 4294967295)")]
    ContainerTooLarge(usize),

    /// JSON chunk serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
