//! Axis-aligned cube

use crate::foundation::math::utils::face_normal;
use crate::foundation::math::Vec3;
use crate::geometry::palette_color;
use crate::render::primitives::mesh::{Index, Mesh, Vertex};

/// Number of vertices in a cube mesh
pub const VERTEX_COUNT: usize = 24;

/// Number of indices in a cube mesh
pub const INDEX_COUNT: usize = 36;

// Outward normal with in-face axes u, v chosen so that u x v == normal
fn faces() -> [(Vec3, Vec3, Vec3); 6] {
    [
        (Vec3::x(), Vec3::y(), Vec3::z()),
        (-Vec3::x(), Vec3::z(), Vec3::y()),
        (Vec3::y(), Vec3::z(), Vec3::x()),
        (-Vec3::y(), Vec3::x(), Vec3::z()),
        (Vec3::z(), Vec3::x(), Vec3::y()),
        (-Vec3::z(), Vec3::y(), Vec3::x()),
    ]
}

/// Cube of edge length `side` centred at the origin
///
/// Each face has its own four vertices so it can carry a flat normal and
/// its own palette color.
pub fn cube(side: f32) -> Mesh {
    let half = side * 0.5;
    let mut vertices = Vec::with_capacity(VERTEX_COUNT);
    let mut indices = Vec::with_capacity(INDEX_COUNT);

    for (face, (outward, u, v)) in faces().into_iter().enumerate() {
        let center = outward * half;
        let corners = [
            center + (-u - v) * half,
            center + (u - v) * half,
            center + (u + v) * half,
            center + (-u + v) * half,
        ];
        let normal = face_normal(&corners[0], &corners[1], &corners[2], &outward);
        let color = palette_color(face);

        let base = vertices.len() as Index;
        vertices.extend(corners.iter().map(|&p| Vertex::untextured(p, color, normal)));
        indices.extend([0, 1, 2, 0, 2, 3].map(|i| base + i));
    }

    Mesh::from_geometry(vertices, indices)
}
