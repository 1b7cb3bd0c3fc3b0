//! Upload hook between meshes and a rendering backend
//!
//! A renderer implements [`RenderBackend`] to receive finalized vertex and
//! index data. The handles it returns are opaque to the rest of the crate.

use crate::render::RenderError;
use std::path::Path;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Number of data buffers behind every uploaded mesh (vertex + index)
pub const BUFFERS_PER_MESH: usize = 2;

/// Handle to a buffer stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a vertex-array (attribute layout) object stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u64);

/// Handle to a texture stored in the backend
///
/// Meshes only reference textures; they never destroy them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// The backend resources behind one uploaded mesh
///
/// Move-only. The handles go back to the backend through
/// [`RenderBackend::destroy_buffers`], which consumes the bundle.
#[derive(Debug, PartialEq, Eq)]
pub struct MeshBuffers {
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    vertex_array: VertexArrayHandle,
}

impl MeshBuffers {
    /// Bundle freshly created handles
    pub fn new(vertex_buffer: BufferHandle, index_buffer: BufferHandle, vertex_array: VertexArrayHandle) -> Self {
        Self {
            vertex_buffer,
            index_buffer,
            vertex_array,
        }
    }

    /// Vertex buffer handle
    pub fn vertex_buffer(&self) -> BufferHandle {
        self.vertex_buffer
    }

    /// Index buffer handle
    pub fn index_buffer(&self) -> BufferHandle {
        self.index_buffer
    }

    /// Vertex-array handle
    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }
}

/// Upload hook implemented by rendering backends
///
/// Calls assume the backend's context is current on the calling thread.
pub trait RenderBackend {
    /// Create vertex, index and vertex-array resources from raw bytes
    ///
    /// `vertex_bytes` is a tightly packed slice of [`crate::render::Vertex`]
    /// and `index_bytes` a slice of `u16` indices.
    fn create_buffers(&mut self, vertex_bytes: &[u8], index_bytes: &[u8]) -> BackendResult<MeshBuffers>;

    /// Destroy the resources behind one mesh
    fn destroy_buffers(&mut self, buffers: MeshBuffers);

    /// Load a texture from `path`, returning `None` if it cannot be loaded
    ///
    /// The backend owns the texture until [`RenderBackend::destroy_texture`].
    /// Meshes only hold the handle and never free it.
    fn create_texture(&mut self, path: &Path) -> Option<TextureHandle>;

    /// Free a texture created by [`RenderBackend::create_texture`]
    fn destroy_texture(&mut self, texture: TextureHandle);
}
