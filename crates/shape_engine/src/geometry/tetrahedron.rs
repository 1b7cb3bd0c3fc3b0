//! Regular tetrahedron

use crate::foundation::math::utils::face_normal;
use crate::foundation::math::Vec3;
use crate::geometry::palette_color;
use crate::render::primitives::mesh::{Index, Mesh, Vertex};

/// Regular tetrahedron inscribed in a sphere of `radius`
///
/// Every face gets its own three vertices with a flat normal pointing away
/// from the corner the face excludes.
pub fn tetrahedron(radius: f32) -> Mesh {
    let scale = radius / 3.0_f32.sqrt();
    let a = Vec3::new(1.0, 1.0, 1.0) * scale;
    let b = Vec3::new(1.0, -1.0, -1.0) * scale;
    let c = Vec3::new(-1.0, 1.0, -1.0) * scale;
    let d = Vec3::new(-1.0, -1.0, 1.0) * scale;

    // (triangle, excluded corner)
    let faces = [([a, d, b], c), ([a, c, d], b), ([a, b, c], d), ([b, d, c], a)];

    let mut vertices = Vec::with_capacity(12);
    let mut indices = Vec::with_capacity(12);
    for (face, (corners, excluded)) in faces.into_iter().enumerate() {
        let normal = face_normal(&corners[0], &corners[1], &corners[2], &-excluded);
        let color = palette_color(face);

        indices.extend((0..3).map(|i| (vertices.len() + i) as Index));
        vertices.extend(corners.iter().map(|&p| Vertex::untextured(p, color, normal)));
    }

    Mesh::from_geometry(vertices, indices)
}
