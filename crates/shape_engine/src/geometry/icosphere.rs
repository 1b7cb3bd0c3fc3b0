//! Icosphere subdivision
//!
//! Each pass splits every triangle into four by inserting a vertex at the
//! midpoint of each edge and pushing it back onto the sphere. Edges shared by
//! two triangles must produce a single vertex, so midpoints are looked up in
//! a [`MidpointCache`] keyed by the unordered edge.

use crate::foundation::math::utils::normalize_or;
use crate::foundation::math::Vec3;
use crate::geometry::GeometryError;
use crate::render::primitives::mesh::{Index, Vertex, MAX_VERTICES};
use std::collections::HashMap;

/// Unordered edge between two vertex indices, packed as `(min << 32) | max`
pub type EdgeKey = u64;

/// Canonical key for the edge between `a` and `b`
pub fn edge_key(a: u32, b: u32) -> EdgeKey {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    (u64::from(lo) << 32) | u64::from(hi)
}

/// Triangles after `level` passes over an icosahedron
pub fn triangle_count(level: u32) -> usize {
    20 * 4usize.pow(level)
}

/// Vertices after `level` passes over an icosahedron
pub fn vertex_count(level: u32) -> usize {
    10 * 4usize.pow(level) + 2
}

/// Edge-to-midpoint map for one subdivision run
///
/// Never shared between shapes; a fresh cache is built for every
/// [`subdivide`] call.
#[derive(Debug)]
pub struct MidpointCache {
    radius: f32,
    midpoints: HashMap<EdgeKey, u32>,
    hits: usize,
}

impl MidpointCache {
    /// Empty cache for a sphere of `radius`
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            midpoints: HashMap::new(),
            hits: 0,
        }
    }

    /// Index of the midpoint vertex of edge `(a, b)`
    ///
    /// On a miss the midpoint is appended to `vertices`. Fails if that would
    /// exceed the 16-bit index range.
    pub fn midpoint(&mut self, vertices: &mut Vec<Vertex>, a: u32, b: u32) -> Result<u32, GeometryError> {
        let key = edge_key(a, b);
        if let Some(&index) = self.midpoints.get(&key) {
            self.hits += 1;
            return Ok(index);
        }

        if vertices.len() >= MAX_VERTICES {
            return Err(GeometryError::TooManyVertices(vertices.len() + 1));
        }

        let vertex = midpoint_vertex(&vertices[a as usize], &vertices[b as usize], self.radius);
        let index = vertices.len() as u32;
        vertices.push(vertex);
        self.midpoints.insert(key, index);
        Ok(index)
    }

    /// Number of cached midpoints
    pub fn len(&self) -> usize {
        self.midpoints.len()
    }

    /// Whether no midpoint has been created yet
    pub fn is_empty(&self) -> bool {
        self.midpoints.is_empty()
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }
}

fn midpoint_vertex(v1: &Vertex, v2: &Vertex, radius: f32) -> Vertex {
    let p1 = v1.position_vec();
    let p2 = v2.position_vec();
    let direction = normalize_or(&(p1 + p2), normalize_or(&p1, Vec3::z()));
    let normal = normalize_or(&(v1.normal_vec() + v2.normal_vec()), direction);

    let average = |a: f32, b: f32| (a + b) * 0.5;
    Vertex::new(
        (direction * radius).into(),
        [0, 1, 2].map(|i| average(v1.color[i], v2.color[i])),
        normal.into(),
        [0, 1].map(|i| average(v1.tex_coord[i], v2.tex_coord[i])),
    )
}

/// Project `vertices` onto the sphere of `radius` about the origin
///
/// Zero normals are replaced by the radial direction.
pub fn project_to_sphere(vertices: &mut [Vertex], radius: f32) {
    for vertex in vertices {
        let direction = normalize_or(&vertex.position_vec(), Vec3::z());
        vertex.position = (direction * radius).into();
        vertex.normal = normalize_or(&vertex.normal_vec(), direction).into();
    }
}

/// Subdivide a base mesh `level` times onto a sphere of `radius`
///
/// The base vertices are projected first, so any closed triangle mesh
/// around the origin works as a seed; the icosahedron gives the most even
/// result.
pub fn subdivide(
    base_vertices: &[Vertex],
    base_indices: &[Index],
    radius: f32,
    level: u32,
) -> Result<(Vec<Vertex>, Vec<Index>), GeometryError> {
    let mut vertices = base_vertices.to_vec();
    project_to_sphere(&mut vertices, radius);

    let mut triangles: Vec<[u32; 3]> = base_indices
        .chunks_exact(3)
        .map(|t| [u32::from(t[0]), u32::from(t[1]), u32::from(t[2])])
        .collect();

    let mut cache = MidpointCache::new(radius);
    for _ in 0..level {
        let mut next = Vec::with_capacity(triangles.len() * 4);
        for [v0, v1, v2] in triangles {
            let m01 = cache.midpoint(&mut vertices, v0, v1)?;
            let m12 = cache.midpoint(&mut vertices, v1, v2)?;
            let m20 = cache.midpoint(&mut vertices, v2, v0)?;

            next.push([v0, m01, m20]);
            next.push([v1, m12, m01]);
            next.push([v2, m20, m12]);
            next.push([m01, m12, m20]);
        }
        triangles = next;
    }

    log::debug!(
        "Subdivided {} triangles to level {}: {} vertices, {} triangles, {} midpoint hits",
        base_indices.len() / 3,
        level,
        vertices.len(),
        triangles.len(),
        cache.hits()
    );

    // Every index is below MAX_VERTICES, checked as midpoints were created
    let indices = triangles
        .into_iter()
        .flatten()
        .map(|i| i as Index)
        .collect();
    Ok((vertices, indices))
}

/// Stretch unit-sphere positions into an ellipsoid with semi-axes `radii`
///
/// Normals are left as they are, which is only exact for a sphere.
pub fn scale_to_ellipsoid(vertices: &mut [Vertex], radii: Vec3) {
    for vertex in vertices {
        vertex.position = vertex.position_vec().component_mul(&radii).into();
    }
}
