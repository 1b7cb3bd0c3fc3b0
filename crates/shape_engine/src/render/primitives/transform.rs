//! Model transform composition
//!
//! Each mesh carries four independent transform components. Setting one
//! replaces it outright; nothing accumulates. The combined matrix is
//! `revolve · translate · rotate · scale`, so a vertex is scaled, then
//! rotated about its own origin, then placed, and finally revolved about the
//! world origin.

use crate::foundation::cache::Cached;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Four-component model transform with a lazily composed result
#[derive(Debug, Clone)]
pub struct ModelTransform {
    translate: Mat4,
    rotate: Mat4,
    scale: Mat4,
    revolve: Mat4,
    combined: Cached<Mat4>,
}

impl ModelTransform {
    /// Identity transform
    pub fn new() -> Self {
        Self {
            translate: Mat4::identity(),
            rotate: Mat4::identity(),
            scale: Mat4::identity(),
            revolve: Mat4::identity(),
            combined: Cached::new(Mat4::identity()),
        }
    }

    /// Replace the translation
    pub fn translate(&mut self, offset: Vec3) {
        self.translate = Mat4::translation_matrix(&offset);
        self.combined.invalidate();
    }

    /// Replace the model-space rotation (`angle` in radians)
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.rotate = Mat4::axis_angle_matrix(angle, &axis);
        self.combined.invalidate();
    }

    /// Replace the model-space scale
    pub fn scale(&mut self, factors: Vec3) {
        self.scale = Mat4::scale_matrix(&factors);
        self.combined.invalidate();
    }

    /// Replace the world-space revolution (`angle` in radians)
    pub fn revolve(&mut self, angle: f32, axis: Vec3) {
        self.revolve = Mat4::axis_angle_matrix(angle, &axis);
        self.combined.invalidate();
    }

    /// Combined transform, recomposed only if a component changed
    pub fn matrix(&mut self) -> Mat4 {
        let (revolve, translate, rotate, scale) = (&self.revolve, &self.translate, &self.rotate, &self.scale);
        self.combined
            .get_or_update(|| revolve * translate * rotate * scale)
    }

    /// Reset every component and the combined matrix to identity
    pub fn clear(&mut self) {
        self.translate = Mat4::identity();
        self.rotate = Mat4::identity();
        self.scale = Mat4::identity();
        self.revolve = Mat4::identity();
        self.combined.reset(Mat4::identity());
    }

    /// Whether the next [`ModelTransform::matrix`] call recomposes
    pub fn is_dirty(&self) -> bool {
        self.combined.is_dirty()
    }

    /// Number of times the combined matrix has been recomposed
    pub fn recompute_count(&self) -> u64 {
        self.combined.recompute_count()
    }

    /// Translation component
    pub fn translation_matrix(&self) -> &Mat4 {
        &self.translate
    }

    /// Rotation component
    pub fn rotation_matrix(&self) -> &Mat4 {
        &self.rotate
    }

    /// Scale component
    pub fn scale_matrix(&self) -> &Mat4 {
        &self.scale
    }

    /// Revolution component
    pub fn revolve_matrix(&self) -> &Mat4 {
        &self.revolve
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::new()
    }
}
