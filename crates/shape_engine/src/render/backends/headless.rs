//! In-memory rendering backend
//!
//! Keeps uploaded buffers and decoded textures in slot maps instead of
//! handing them to a graphics API. Used by tests and the headless demo to
//! observe what a real backend would receive.

use crate::assets::image_loader::ImageData;
use crate::foundation::collections::{key_to_raw, raw_to_key, HandleMap};
use crate::render::backend::{
    BackendResult, BufferHandle, MeshBuffers, RenderBackend, TextureHandle, VertexArrayHandle, BUFFERS_PER_MESH,
};
use crate::render::primitives::mesh::{Index, Vertex};
use crate::render::RenderError;
use std::mem::size_of;
use std::path::Path;

#[derive(Debug)]
struct VertexArray {
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
}

/// Rendering backend that stores everything in memory
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    buffers: HandleMap<Vec<u8>>,
    vertex_arrays: HandleMap<VertexArray>,
    textures: HandleMap<ImageData>,
    vertex_bytes: usize,
    index_bytes: usize,
    created: usize,
    destroyed: usize,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes whose buffers are alive
    pub fn live_mesh_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Number of live vertex and index buffers
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Bytes held by live vertex buffers
    pub fn vertex_bytes_in_use(&self) -> usize {
        self.vertex_bytes
    }

    /// Bytes held by live index buffers
    pub fn index_bytes_in_use(&self) -> usize {
        self.index_bytes
    }

    /// Number of `create_buffers` calls that succeeded
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Number of `destroy_buffers` calls that freed resources
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    /// Number of loaded textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Decoded texture behind `handle`
    pub fn texture(&self, handle: TextureHandle) -> Option<&ImageData> {
        self.textures.get(raw_to_key(handle.0))
    }

    /// Raw contents of a live buffer
    pub fn buffer_data(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(raw_to_key(handle.0)).map(Vec::as_slice)
    }

    /// Vertices stored in a live vertex buffer
    pub fn vertices(&self, buffers: &MeshBuffers) -> Option<Vec<Vertex>> {
        let bytes = self.buffer_data(buffers.vertex_buffer())?;
        Some(bytes.chunks_exact(Vertex::STRIDE).map(bytemuck::pod_read_unaligned).collect())
    }

    /// Indices stored in a live index buffer
    pub fn indices(&self, buffers: &MeshBuffers) -> Option<Vec<Index>> {
        let bytes = self.buffer_data(buffers.index_buffer())?;
        Some(bytes.chunks_exact(size_of::<Index>()).map(bytemuck::pod_read_unaligned).collect())
    }

    fn store_buffer(&mut self, bytes: &[u8]) -> BufferHandle {
        BufferHandle(key_to_raw(self.buffers.insert(bytes.to_vec())))
    }

    fn free_buffer(&mut self, handle: BufferHandle) -> usize {
        self.buffers
            .remove(raw_to_key(handle.0))
            .map_or(0, |bytes| bytes.len())
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_buffers(&mut self, vertex_bytes: &[u8], index_bytes: &[u8]) -> BackendResult<MeshBuffers> {
        if vertex_bytes.len() % Vertex::STRIDE != 0 {
            return Err(RenderError::InvalidBufferData(format!(
                "vertex data of {} bytes is not a multiple of the {}-byte stride",
                vertex_bytes.len(),
                Vertex::STRIDE
            )));
        }
        if index_bytes.len() % size_of::<Index>() != 0 {
            return Err(RenderError::InvalidBufferData(format!(
                "index data of {} bytes is not a whole number of indices",
                index_bytes.len()
            )));
        }

        let vertex_buffer = self.store_buffer(vertex_bytes);
        let index_buffer = self.store_buffer(index_bytes);
        let vertex_array = VertexArrayHandle(key_to_raw(self.vertex_arrays.insert(VertexArray {
            vertex_buffer,
            index_buffer,
        })));

        self.vertex_bytes += vertex_bytes.len();
        self.index_bytes += index_bytes.len();
        self.created += 1;

        log::trace!(
            "Created {} buffers ({} + {} bytes)",
            BUFFERS_PER_MESH,
            vertex_bytes.len(),
            index_bytes.len()
        );
        Ok(MeshBuffers::new(vertex_buffer, index_buffer, vertex_array))
    }

    fn destroy_buffers(&mut self, buffers: MeshBuffers) {
        let Some(array) = self.vertex_arrays.remove(raw_to_key(buffers.vertex_array().0)) else {
            log::warn!("Destroying unknown vertex array {:?}", buffers.vertex_array());
            return;
        };
        debug_assert_eq!(array.vertex_buffer, buffers.vertex_buffer());
        debug_assert_eq!(array.index_buffer, buffers.index_buffer());

        self.vertex_bytes -= self.free_buffer(array.vertex_buffer);
        self.index_bytes -= self.free_buffer(array.index_buffer);
        self.destroyed += 1;
    }

    fn create_texture(&mut self, path: &Path) -> Option<TextureHandle> {
        match ImageData::from_file(path) {
            Ok(image) => Some(TextureHandle(key_to_raw(self.textures.insert(image)))),
            Err(e) => {
                log::warn!("Texture {} not loaded: {}", path.display(), e);
                None
            }
        }
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(raw_to_key(texture.0)).is_none() {
            log::warn!("Destroying unknown texture {:?}", texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_bytes(count: usize) -> Vec<u8> {
        let vertices = vec![Vertex::default(); count];
        bytemuck::cast_slice(&vertices).to_vec()
    }

    #[test]
    fn test_create_and_destroy_tracks_usage() {
        let mut backend = HeadlessBackend::new();
        let indices: [Index; 3] = [0, 1, 2];

        let buffers = backend
            .create_buffers(&vertex_bytes(3), bytemuck::cast_slice(&indices))
            .unwrap();
        assert_eq!(backend.live_mesh_count(), 1);
        assert_eq!(backend.live_buffer_count(), BUFFERS_PER_MESH);
        assert_eq!(backend.vertex_bytes_in_use(), 3 * Vertex::STRIDE);
        assert_eq!(backend.index_bytes_in_use(), 6);
        assert_eq!(backend.indices(&buffers), Some(vec![0, 1, 2]));

        backend.destroy_buffers(buffers);
        assert_eq!(backend.live_mesh_count(), 0);
        assert_eq!(backend.live_buffer_count(), 0);
        assert_eq!(backend.vertex_bytes_in_use(), 0);
        assert_eq!(backend.index_bytes_in_use(), 0);
        assert_eq!(backend.created_count(), 1);
        assert_eq!(backend.destroyed_count(), 1);
    }

    #[test]
    fn test_rejects_ragged_vertex_data() {
        let mut backend = HeadlessBackend::new();
        let err = backend.create_buffers(&[0u8; 5], &[]).unwrap_err();

        assert!(matches!(err, RenderError::InvalidBufferData(_)));
        assert_eq!(backend.live_buffer_count(), 0);
    }

    #[test]
    fn test_rejects_odd_index_bytes() {
        let mut backend = HeadlessBackend::new();
        let err = backend.create_buffers(&vertex_bytes(1), &[0u8; 3]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidBufferData(_)));
    }

    #[test]
    fn test_texture_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let mut backend = HeadlessBackend::new();
        let handle = backend.create_texture(&path).unwrap();
        let texture = backend.texture(handle).unwrap();

        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(&texture.data[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_destroy_texture_frees_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([255; 4])).save(&path).unwrap();

        let mut backend = HeadlessBackend::new();
        let handle = backend.create_texture(&path).unwrap();
        backend.destroy_texture(handle);

        assert_eq!(backend.texture_count(), 0);
        assert!(backend.texture(handle).is_none());
        // a stale handle is ignored
        backend.destroy_texture(handle);
    }

    #[test]
    fn test_missing_texture_is_none() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.create_texture(Path::new("does/not/exist.png")).is_none());
        assert_eq!(backend.texture_count(), 0);
    }
}
