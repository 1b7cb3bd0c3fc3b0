//! Mesh representation for procedural and imported shapes
//!
//! A [`Mesh`] is the common currency between the generators, the OBJ adapter
//! and the renderer. It owns its vertex and index arrays, its model transform
//! and, once uploaded, the backend buffers created from those arrays.
//!
//! # Buffer ownership
//! [`MeshBuffers`] is move-only. [`Mesh::upload`] destroys any buffers the
//! mesh already owns before creating new ones, and [`Mesh::release`] takes
//! them out of the mesh, so a handle can never be destroyed twice. Clones
//! copy the geometry but start without buffers.

use crate::foundation::math::{Mat4, Vec3};
use crate::render::backend::{BackendResult, MeshBuffers, RenderBackend, TextureHandle};
use crate::render::primitives::transform::ModelTransform;
use std::mem::{offset_of, size_of};
use thiserror::Error;

/// Index type used by every mesh
pub type Index = u16;

/// Largest vertex count addressable by [`Index`]
pub const MAX_VERTICES: usize = Index::MAX as usize + 1;

/// Vertex data structure with position, color, normal and texture coordinates
///
/// `#[repr(C)]` with no padding, so a slice of vertices can be handed to a
/// backend as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// RGB color, each channel in [0, 1]
    pub color: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

/// One attribute of the interleaved vertex layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader attribute location
    pub location: u32,
    /// Number of `f32` components
    pub components: u32,
    /// Byte offset inside [`Vertex`]
    pub offset: usize,
}

impl Vertex {
    /// Size of one vertex in bytes
    pub const STRIDE: usize = size_of::<Self>();

    /// Create a new vertex
    pub fn new(position: [f32; 3], color: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            color,
            normal,
            tex_coord,
        }
    }

    /// Create a vertex for an untextured shape (placeholder texture coordinate)
    pub fn untextured(position: Vec3, color: [f32; 3], normal: Vec3) -> Self {
        Self::new(position.into(), color, normal.into(), [0.0, 0.0])
    }

    /// Position as a vector
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Normal as a vector
    pub fn normal_vec(&self) -> Vec3 {
        Vec3::from(self.normal)
    }

    /// Attribute layout: position, color, normal, texture coordinate
    pub fn attributes() -> [VertexAttribute; 4] {
        [
            VertexAttribute { location: 0, components: 3, offset: offset_of!(Vertex, position) },
            VertexAttribute { location: 1, components: 3, offset: offset_of!(Vertex, color) },
            VertexAttribute { location: 2, components: 3, offset: offset_of!(Vertex, normal) },
            VertexAttribute { location: 3, components: 2, offset: offset_of!(Vertex, tex_coord) },
        ]
    }
}

/// Primitive topology the renderer should draw the indices with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    /// Independent triangles
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Triangle fan
    TriangleFan,
    /// Independent line segments
    Lines,
    /// Connected line segments
    LineStrip,
    /// Closed line loop
    LineLoop,
    /// Points
    Points,
}

/// Ways an index list can fail to describe a triangle list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// An index refers past the end of the vertex list
    #[error("index {index} at position {position} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// Offending index value
        index: usize,
        /// Position of the index in the index list
        position: usize,
        /// Number of vertices available
        vertex_count: usize,
    },

    /// The index count is not a multiple of three
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    /// More vertices than a 16-bit index can address
    #[error("{0} vertices exceed the 16-bit index limit of {MAX_VERTICES}")]
    TooManyVertices(usize),
}

/// Check that `indices` forms a triangle list over `vertex_count` vertices
pub fn check_topology<I>(vertex_count: usize, indices: I) -> Result<(), TopologyError>
where
    I: IntoIterator,
    I::Item: Into<u64>,
{
    if vertex_count > MAX_VERTICES {
        return Err(TopologyError::TooManyVertices(vertex_count));
    }

    let mut count = 0;
    for (position, index) in indices.into_iter().enumerate() {
        let index = index.into() as usize;
        if index >= vertex_count {
            return Err(TopologyError::IndexOutOfBounds {
                index,
                position,
                vertex_count,
            });
        }
        count += 1;
    }

    if count % 3 != 0 {
        return Err(TopologyError::IncompleteTriangle(count));
    }
    Ok(())
}

/// Mesh containing vertices, indices, model transform and backend buffers
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<Index>,
    transform: ModelTransform,
    texture: Option<TextureHandle>,
    draw_mode: DrawMode,
    solid: bool,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            transform: ModelTransform::new(),
            texture: None,
            draw_mode: DrawMode::default(),
            solid: true,
            buffers: None,
        }
    }

    /// Create a mesh from generated geometry
    ///
    /// # Panics
    /// If `indices` is not a valid triangle list over `vertices`. Generators
    /// call this, so a failure is a generator bug.
    pub fn from_geometry(vertices: Vec<Vertex>, indices: Vec<Index>) -> Self {
        if let Err(err) = check_topology(vertices.len(), indices.iter().copied()) {
            panic!("generator produced invalid mesh topology: {err}");
        }

        let mut mesh = Self::new();
        mesh.vertices = vertices;
        mesh.indices = indices;
        mesh
    }

    /// Vertex data
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Mutable vertex data
    ///
    /// The slice cannot change length, so indices stay valid. Call
    /// [`Mesh::upload`] afterwards to push the edit to the backend.
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    /// Index data
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    /// Vertex at `i`
    pub fn vertex(&self, i: usize) -> Option<&Vertex> {
        self.vertices.get(i)
    }

    /// Index at `i`
    pub fn index(&self, i: usize) -> Option<Index> {
        self.indices.get(i).copied()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Size of the vertex buffer in bytes
    pub fn vertex_buffer_size(&self) -> usize {
        self.vertices.len() * Vertex::STRIDE
    }

    /// Size of the index buffer in bytes
    pub fn index_buffer_size(&self) -> usize {
        self.indices.len() * size_of::<Index>()
    }

    /// Iterate over triangles as vertex index triples
    pub fn triangles(&self) -> impl Iterator<Item = [Index; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Upload the vertex and index data to `backend`
    ///
    /// Buffers from a previous upload are destroyed first.
    pub fn upload<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> BackendResult<()> {
        if let Some(stale) = self.buffers.take() {
            backend.destroy_buffers(stale);
        }

        let buffers = backend.create_buffers(
            bytemuck::cast_slice(&self.vertices),
            bytemuck::cast_slice(&self.indices),
        )?;
        log::trace!(
            "Uploaded mesh: {} vertices ({} bytes), {} indices ({} bytes)",
            self.vertex_count(),
            self.vertex_buffer_size(),
            self.index_count(),
            self.index_buffer_size()
        );
        self.buffers = Some(buffers);
        Ok(())
    }

    /// Replace the geometry and regenerate the backend buffers
    ///
    /// # Panics
    /// If the new indices are not a valid triangle list over the new vertices.
    pub fn replace_geometry<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        vertices: Vec<Vertex>,
        indices: Vec<Index>,
    ) -> BackendResult<()> {
        if let Err(err) = check_topology(vertices.len(), indices.iter().copied()) {
            panic!("replacement geometry has invalid topology: {err}");
        }

        if let Some(stale) = self.buffers.take() {
            backend.destroy_buffers(stale);
        }
        self.vertices = vertices;
        self.indices = indices;
        self.upload(backend)
    }

    /// Destroy the backend buffers and clear the vertex and index data
    ///
    /// Releasing an already released mesh does nothing.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(buffers) = self.buffers.take() {
            backend.destroy_buffers(buffers);
        }
        self.vertices = Vec::new();
        self.indices = Vec::new();
    }

    /// Whether the mesh currently owns backend buffers
    pub fn is_uploaded(&self) -> bool {
        self.buffers.is_some()
    }

    /// Backend buffers, if uploaded
    pub fn buffers(&self) -> Option<&MeshBuffers> {
        self.buffers.as_ref()
    }

    /// Texture reference
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Set or clear the texture reference
    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    /// Draw mode
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Set the draw mode
    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    /// Whether the mesh is drawn filled (as opposed to wireframe)
    pub fn is_solid(&self) -> bool {
        self.solid
    }

    /// Switch between filled and wireframe presentation
    pub fn set_solid(&mut self, solid: bool) {
        self.solid = solid;
    }

    /// Set the translation into world space
    pub fn translate(&mut self, offset: Vec3) {
        self.transform.translate(offset);
    }

    /// Set the model-space rotation
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.transform.rotate(angle, axis);
    }

    /// Set the model-space scale
    pub fn scale(&mut self, factors: Vec3) {
        self.transform.scale(factors);
    }

    /// Set the world-space revolution about the origin
    pub fn revolve(&mut self, angle: f32, axis: Vec3) {
        self.transform.revolve(angle, axis);
    }

    /// Combined model-to-world transform
    pub fn transform(&mut self) -> Mat4 {
        self.transform.matrix()
    }

    /// Reset every transform component to identity
    pub fn clear_transform(&mut self) {
        self.transform.clear();
    }

    /// The transform composer
    pub fn model_transform(&self) -> &ModelTransform {
        &self.transform
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Mesh {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
            transform: self.transform.clone(),
            texture: self.texture,
            draw_mode: self.draw_mode,
            solid: self.solid,
            buffers: None,
        }
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("texture", &self.texture)
            .field("draw_mode", &self.draw_mode)
            .field("solid", &self.solid)
            .field("buffers", &self.buffers)
            .finish()
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if let Some(buffers) = &self.buffers {
            log::warn!("Mesh dropped without release; leaking backend buffers {:?}", buffers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessBackend;

    fn triangle() -> Mesh {
        let normal = Vec3::z();
        Mesh::from_geometry(
            vec![
                Vertex::untextured(Vec3::new(0.0, 0.0, 0.0), [1.0, 0.0, 0.0], normal),
                Vertex::untextured(Vec3::new(1.0, 0.0, 0.0), [0.0, 1.0, 0.0], normal),
                Vertex::untextured(Vec3::new(0.0, 1.0, 0.0), [0.0, 0.0, 1.0], normal),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 11 * size_of::<f32>());

        let offsets: Vec<usize> = Vertex::attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 36]);

        let components: u32 = Vertex::attributes().iter().map(|a| a.components).sum();
        assert_eq!(components as usize * size_of::<f32>(), Vertex::STRIDE);
    }

    #[test]
    fn test_buffer_sizes() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_buffer_size(), 3 * 44);
        assert_eq!(mesh.index_buffer_size(), 3 * 2);
    }

    #[test]
    fn test_check_topology_rejects_out_of_bounds() {
        let err = check_topology(3, [0u16, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            TopologyError::IndexOutOfBounds { index: 3, position: 2, vertex_count: 3 }
        );
    }

    #[test]
    fn test_check_topology_rejects_partial_triangle() {
        let err = check_topology(3, [0u32, 1, 2, 0]).unwrap_err();
        assert_eq!(err, TopologyError::IncompleteTriangle(4));
    }

    #[test]
    fn test_check_topology_rejects_vertex_overflow() {
        let err = check_topology(MAX_VERTICES + 1, std::iter::empty::<u32>()).unwrap_err();
        assert_eq!(err, TopologyError::TooManyVertices(MAX_VERTICES + 1));
    }

    #[test]
    #[should_panic(expected = "invalid mesh topology")]
    fn test_from_geometry_panics_on_bad_index() {
        let _ = Mesh::from_geometry(vec![Vertex::default()], vec![0, 0, 1]);
    }

    #[test]
    fn test_defaults() {
        let mesh = Mesh::new();
        assert_eq!(mesh.draw_mode(), DrawMode::Triangles);
        assert!(mesh.is_solid());
        assert!(mesh.texture().is_none());
        assert!(!mesh.is_uploaded());
    }

    #[test]
    fn test_upload_then_release() {
        let mut backend = HeadlessBackend::new();
        let mut mesh = triangle();

        mesh.upload(&mut backend).unwrap();
        assert!(mesh.is_uploaded());
        assert_eq!(backend.live_mesh_count(), 1);
        assert_eq!(backend.vertex_bytes_in_use(), mesh.vertex_buffer_size());

        mesh.release(&mut backend);
        assert!(!mesh.is_uploaded());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(backend.live_mesh_count(), 0);

        // Second release is a no-op
        mesh.release(&mut backend);
        assert_eq!(backend.destroyed_count(), 1);
    }

    #[test]
    fn test_reupload_destroys_previous_buffers() {
        let mut backend = HeadlessBackend::new();
        let mut mesh = triangle();

        mesh.upload(&mut backend).unwrap();
        mesh.upload(&mut backend).unwrap();

        assert_eq!(backend.live_mesh_count(), 1);
        assert_eq!(backend.destroyed_count(), 1);
        mesh.release(&mut backend);
    }

    #[test]
    fn test_replace_geometry_regenerates_buffers() {
        let mut backend = HeadlessBackend::new();
        let mut mesh = triangle();
        mesh.upload(&mut backend).unwrap();

        let mut vertices = mesh.vertices().to_vec();
        vertices.push(Vertex::untextured(Vec3::new(1.0, 1.0, 0.0), [1.0, 1.0, 0.0], Vec3::z()));
        mesh.replace_geometry(&mut backend, vertices, vec![0, 1, 2, 1, 3, 2]).unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(backend.live_mesh_count(), 1);
        assert_eq!(backend.vertex_bytes_in_use(), 4 * Vertex::STRIDE);
        mesh.release(&mut backend);
    }

    #[test]
    fn test_clone_copies_geometry_but_not_buffers() {
        let mut backend = HeadlessBackend::new();
        let mut mesh = triangle();
        mesh.set_solid(false);
        mesh.upload(&mut backend).unwrap();

        let copy = mesh.clone();
        assert_eq!(copy.vertices(), mesh.vertices());
        assert_eq!(copy.indices(), mesh.indices());
        assert!(!copy.is_solid());
        assert!(!copy.is_uploaded());

        mesh.release(&mut backend);
        assert_eq!(backend.live_mesh_count(), 0);
    }

    #[test]
    fn test_triangles_iterator() {
        let mesh = triangle();
        let triangles: Vec<[Index; 3]> = mesh.triangles().collect();
        assert_eq!(triangles, vec![[0, 1, 2]]);
    }
}
