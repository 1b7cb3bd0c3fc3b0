//! Rendering-facing types
//!
//! The mesh data model, the transform composer and the upload hook a
//! renderer implements to receive mesh data. Nothing here talks to a
//! graphics API directly.

pub mod backend;
pub mod backends;
pub mod primitives;

pub use backend::{BackendResult, BufferHandle, MeshBuffers, RenderBackend, TextureHandle, VertexArrayHandle};
pub use backends::HeadlessBackend;
pub use primitives::{DrawMode, Mesh, ModelTransform, Vertex};

use thiserror::Error;

/// Rendering error types
///
/// Errors a backend reports while creating or managing the resources behind
/// a mesh, abstracted from any specific graphics API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Resource creation or management failed
    ///
    /// Occurs when buffers or textures cannot be created, typically due to
    /// memory constraints or an unusable context.
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Data handed to the backend cannot be turned into a buffer
    #[error("Invalid buffer data: {0}")]
    InvalidBufferData(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
