//! Error types for connected texture resolution.

use thiserror::Error;

/// Result type alias using CtmError.
pub type Result<T> = std::result::Result<T, CtmError>;

/// Main error type for loading, validating and baking connected texture models.
#[derive(Error, Debug)]
pub enum CtmError {
    /// Failed to read or parse a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found in the resource pack.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Invalid resource pack structure.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// Failed to resolve a block model.
    #[error("Model resolution error: {0}")]
    ModelResolution(String),

    /// Model inheritance chain too deep (circular reference protection).
    #[error("Model inheritance too deep (possible circular reference): {0}")]
    ModelInheritanceTooDeep(String),

    /// The metadata resource of a texture exists but could not be read.
    #[error("Failed to read metadata for texture {texture}: {source}")]
    MetadataRead {
        texture: String,
        #[source]
        source: std::io::Error,
    },

    /// The metadata of a texture could not be understood.
    #[error("Invalid metadata for texture {texture}: {reason}")]
    InvalidMetadata { texture: String, reason: String },

    /// A texture type was given the wrong number of textures.
    #[error("Texture type {texture_type} requires exactly {required} textures. {provided} were provided.")]
    TextureCountMismatch {
        texture_type: String,
        required: usize,
        provided: usize,
    },

    /// Auxiliary texture resolution looped back to a texture still under construction.
    #[error("Recursive texture reference while constructing {0}")]
    RecursiveTexture(String),
}
