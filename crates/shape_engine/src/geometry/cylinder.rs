//! Capped cylinder built from stacked rings

use crate::foundation::math::constants::TAU;
use crate::foundation::math::utils::{circle_point, face_normal};
use crate::foundation::math::Vec3;
use crate::geometry::palette_color;
use crate::render::primitives::mesh::{Index, Mesh, Vertex};

/// Number of side rings for a cylinder of `length`
///
/// One ring per unit of length, rounded up, never fewer than one.
pub fn ring_count(length: f32) -> usize {
    (length.ceil() as usize).max(1)
}

/// Vertices a cylinder with these parameters needs
///
/// Saturates at `usize::MAX` for lengths no mesh could hold.
pub fn vertex_count(length: f32, segments: u32) -> usize {
    let segments = segments as usize;
    let side = ring_count(length).saturating_mul(segments).saturating_mul(4);
    segments.saturating_mul(6).saturating_add(side)
}

/// Cylinder of `radius` and `length` along the Z axis, centred at the origin
///
/// The caps are triangle fans with one palette color per segment. The side
/// is split into [`ring_count`] rings of equal height, one quad per ring and
/// segment.
pub fn cylinder(radius: f32, length: f32, segments: u32) -> Mesh {
    let theta = TAU / segments as f32;
    let bottom = -length * 0.5;
    let top = bottom + length;
    let rings = ring_count(length);
    let ring_height = length / rings as f32;

    let mut vertices = Vec::with_capacity(vertex_count(length, segments));
    let mut indices: Vec<Index> = Vec::with_capacity(segments as usize * (6 + rings * 6));

    let bottom_center = Vec3::new(0.0, 0.0, bottom);
    let top_center = Vec3::new(0.0, 0.0, top);
    for i in 0..segments {
        let (a0, a1) = (i as f32 * theta, (i + 1) as f32 * theta);
        let color = palette_color(i as usize + 1);

        let base = vertices.len() as Index;
        vertices.extend([
            Vertex::untextured(bottom_center, color, -Vec3::z()),
            Vertex::untextured(circle_point(radius, a1, bottom), color, -Vec3::z()),
            Vertex::untextured(circle_point(radius, a0, bottom), color, -Vec3::z()),
            Vertex::untextured(circle_point(radius, a0, top), color, Vec3::z()),
            Vertex::untextured(circle_point(radius, a1, top), color, Vec3::z()),
            Vertex::untextured(top_center, color, Vec3::z()),
        ]);
        indices.extend((0..6).map(|k| base + k));
    }

    for ring in 0..rings {
        let z0 = bottom + ring as f32 * ring_height;
        let z1 = z0 + ring_height;

        for i in 0..segments {
            let (a0, a1) = (i as f32 * theta, (i + 1) as f32 * theta);
            let v0 = circle_point(radius, a0, z0);
            let v1 = circle_point(radius, a1, z0);
            let v2 = circle_point(radius, a0, z1);
            let v3 = circle_point(radius, a1, z1);

            let outward = circle_point(1.0, (a0 + a1) * 0.5, 0.0);
            let normal = face_normal(&v0, &v1, &v2, &outward);
            let color = palette_color(i as usize + ring);

            let base = vertices.len() as Index;
            vertices.extend([v0, v1, v2, v3].map(|p| Vertex::untextured(p, color, normal)));
            indices.extend([0, 1, 2, 3, 2, 1].map(|k| base + k));
        }
    }

    Mesh::from_geometry(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RADIAL_SEGMENTS;
    use approx::assert_relative_eq;

    const SEGMENTS: u32 = DEFAULT_RADIAL_SEGMENTS;

    fn cap_and_side(mesh: &Mesh) -> (&[Vertex], &[Vertex]) {
        mesh.vertices().split_at(SEGMENTS as usize * 6)
    }

    #[test]
    fn test_length_four_counts() {
        let mesh = cylinder(1.0, 4.0, SEGMENTS);
        assert_eq!(mesh.vertex_count(), 120 + 320);
        assert_eq!(mesh.index_count(), 120 + 480);
        assert_eq!(vertex_count(4.0, SEGMENTS), mesh.vertex_count());
    }

    #[test]
    fn test_ring_count() {
        assert_eq!(ring_count(4.0), 4);
        assert_eq!(ring_count(2.5), 3);
        assert_eq!(ring_count(0.25), 1);
    }

    #[test]
    fn test_caps_independent_of_length() {
        let short = cylinder(1.0, 1.0, SEGMENTS);
        let long = cylinder(1.0, 6.0, SEGMENTS);
        let (short_caps, short_side) = cap_and_side(&short);
        let (long_caps, long_side) = cap_and_side(&long);

        assert_eq!(short_caps.len(), long_caps.len());
        assert_eq!(long_side.len(), 6 * short_side.len());
    }

    #[test]
    fn test_cap_normals_are_axial() {
        let mesh = cylinder(1.0, 2.0, SEGMENTS);
        let (caps, _) = cap_and_side(&mesh);
        for vertex in caps {
            let expected = vertex.position[2].signum();
            assert_eq!(vertex.normal, [0.0, 0.0, expected]);
        }
    }

    #[test]
    fn test_side_on_radius_and_normals_outward() {
        let mesh = cylinder(1.5, 3.0, SEGMENTS);
        let (_, side) = cap_and_side(&mesh);
        for vertex in side {
            let p = vertex.position_vec();
            assert_relative_eq!(p.xy().norm(), 1.5, epsilon = 1e-5);
            assert!(p.z >= -1.5 - 1e-5 && p.z <= 1.5 + 1e-5);

            let n = vertex.normal_vec();
            assert_relative_eq!(n.z, 0.0, epsilon = 1e-5);
            assert!(n.dot(&Vec3::new(p.x, p.y, 0.0)) > 0.0);
        }
    }

    #[test]
    fn test_winding_matches_normals() {
        let mesh = cylinder(1.0, 2.5, SEGMENTS);
        for [a, b, c] in mesh.triangles() {
            let [a, b, c] = [a, b, c].map(|i| mesh.vertex(i as usize).unwrap());
            let winding = (b.position_vec() - a.position_vec()).cross(&(c.position_vec() - a.position_vec()));
            assert!(winding.dot(&a.normal_vec()) > 0.0);
        }
    }

    #[test]
    fn test_ring_colors_shift_per_ring() {
        let mesh = cylinder(1.0, 2.0, SEGMENTS);
        let (_, side) = cap_and_side(&mesh);
        let quad = |ring: usize, i: usize| side[(ring * SEGMENTS as usize + i) * 4];

        assert_eq!(quad(0, 0).color, palette_color(0));
        assert_eq!(quad(1, 0).color, palette_color(1));
        assert_eq!(quad(1, 5).color, palette_color(6));
    }
}
