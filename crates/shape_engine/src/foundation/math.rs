//! Math utilities and types
//!
//! Provides the nalgebra aliases used by the generators and the transform composer.

pub use nalgebra::{Matrix4, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Lengths below this are treated as zero when normalizing
pub const NORMALIZE_EPSILON: f32 = 1e-12;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Math utility functions
pub mod utils {
    use super::{Vec3, NORMALIZE_EPSILON};

    /// Point on a circle of `radius` in the XY plane at `angle` radians, lifted to `z`
    pub fn circle_point(radius: f32, angle: f32, z: f32) -> Vec3 {
        Vec3::new(angle.cos() * radius, angle.sin() * radius, z)
    }

    /// Normalize `v`, or return `fallback` when `v` is (nearly) zero length
    pub fn normalize_or(v: &Vec3, fallback: Vec3) -> Vec3 {
        v.try_normalize(NORMALIZE_EPSILON).unwrap_or(fallback)
    }

    /// Unit normal of the triangle `(a, b, c)` flipped to agree with `outward`
    ///
    /// Returns the zero vector for degenerate triangles.
    pub fn face_normal(a: &Vec3, b: &Vec3, c: &Vec3, outward: &Vec3) -> Vec3 {
        let normal = normalize_or(&(b - a).cross(&(c - a)), Vec3::zeros());
        if normal.dot(outward) < 0.0 {
            -normal
        } else {
            normal
        }
    }
}

/// Extension trait for building the affine matrices the transform composer needs
pub trait Mat4Ext {
    /// Translation by `offset`
    fn translation_matrix(offset: &Vec3) -> Mat4;

    /// Non-uniform scale by `factors`
    fn scale_matrix(factors: &Vec3) -> Mat4;

    /// Rotation of `angle` radians about `axis`
    ///
    /// A zero-length axis yields the identity.
    fn axis_angle_matrix(angle: f32, axis: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn translation_matrix(offset: &Vec3) -> Mat4 {
        Mat4::new_translation(offset)
    }

    fn scale_matrix(factors: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(factors)
    }

    fn axis_angle_matrix(angle: f32, axis: &Vec3) -> Mat4 {
        match Unit::try_new(*axis, NORMALIZE_EPSILON) {
            Some(axis) => Mat4::from_axis_angle(&axis, angle),
            None => {
                log::warn!("Ignoring rotation about zero-length axis {:?}", axis);
                Mat4::identity()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_axis_angle_quarter_turn_about_y() {
        let rotation = Mat4::axis_angle_matrix(constants::HALF_PI, &Vec3::new(0.0, 2.0, 0.0));
        let rotated = rotation.transform_vector(&Vec3::x());

        // Right-handed: +X rotated a quarter turn about +Y lands on -Z
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_axis_angle_zero_axis_is_identity() {
        let rotation = Mat4::axis_angle_matrix(1.0, &Vec3::zeros());
        assert_eq!(rotation, Mat4::identity());
    }

    #[test]
    fn test_translation_and_scale() {
        let m = Mat4::translation_matrix(&Vec3::new(1.0, 2.0, 3.0))
            * Mat4::scale_matrix(&Vec3::new(2.0, 2.0, 2.0));
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(3.0, 4.0, 5.0), epsilon = EPSILON);
    }

    #[test]
    fn test_face_normal_follows_outward_hint() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);

        let up = utils::face_normal(&a, &b, &c, &Vec3::z());
        let down = utils::face_normal(&a, &b, &c, &-Vec3::z());

        assert_relative_eq!(up, Vec3::z(), epsilon = EPSILON);
        assert_relative_eq!(down, -Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_face_normal_degenerate_triangle() {
        let a = Vec3::new(1.0, 1.0, 1.0);
        let normal = utils::face_normal(&a, &a, &a, &Vec3::z());
        assert_eq!(normal, Vec3::zeros());
    }
}
