//! Cone with a flat base

use crate::foundation::math::constants::TAU;
use crate::foundation::math::utils::{circle_point, face_normal};
use crate::foundation::math::Vec3;
use crate::geometry::palette_color;
use crate::render::primitives::mesh::{Index, Mesh, Vertex};

/// Vertices a cone with `segments` segments needs
pub fn vertex_count(segments: u32) -> usize {
    segments as usize * 6
}

/// Cone of base `radius` on the XY plane with its apex at `(0, 0, length)`
pub fn cone(radius: f32, length: f32, segments: u32) -> Mesh {
    let theta = TAU / segments as f32;
    let apex = Vec3::new(0.0, 0.0, length);
    let center = Vec3::zeros();

    let mut vertices = Vec::with_capacity(vertex_count(segments));
    let mut indices: Vec<Index> = Vec::with_capacity(vertex_count(segments));

    for i in 0..segments {
        let (a0, a1) = (i as f32 * theta, (i + 1) as f32 * theta);
        let rim0 = circle_point(radius, a0, 0.0);
        let rim1 = circle_point(radius, a1, 0.0);

        let outward = circle_point(1.0, (a0 + a1) * 0.5, 0.0);
        let side_normal = face_normal(&rim0, &rim1, &apex, &outward);
        let side_color = palette_color(i as usize);
        let base_color = palette_color(i as usize + 1);

        let base = vertices.len() as Index;
        vertices.extend([
            Vertex::untextured(rim0, side_color, side_normal),
            Vertex::untextured(rim1, side_color, side_normal),
            Vertex::untextured(apex, side_color, side_normal),
            Vertex::untextured(rim0, base_color, -Vec3::z()),
            Vertex::untextured(center, base_color, -Vec3::z()),
            Vertex::untextured(rim1, base_color, -Vec3::z()),
        ]);
        indices.extend((0..6).map(|k| base + k));
    }

    Mesh::from_geometry(vertices, indices)
}
