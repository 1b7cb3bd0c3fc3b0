//! Mesh construction API
//!
//! [`ShapeFactory`] owns the rendering backend and the model parser, builds
//! each shape from its generator (or from a seed model for spheres and
//! ellipsoids) and hands back an uploaded [`Mesh`].

use crate::assets::obj_loader::{load_mesh, ModelParser, TobjParser};
use crate::config::GeometryConfig;
use crate::foundation::math::Vec3;
use crate::geometry::{cone, cube, cylinder, icosphere, tetrahedron, GeometryError};
use crate::render::backend::{RenderBackend, TextureHandle};
use crate::render::primitives::mesh::{Mesh, MAX_VERTICES};
use std::path::Path;

fn check_size(name: &str, value: f32) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidParameter(format!("{name} must be positive and finite, got {value}")))
    }
}

fn check_vertex_budget(count: usize) -> Result<(), GeometryError> {
    if count > MAX_VERTICES {
        Err(GeometryError::TooManyVertices(count))
    } else {
        Ok(())
    }
}

/// Builds uploaded meshes for the supported shapes
pub struct ShapeFactory<B: RenderBackend, P: ModelParser = TobjParser> {
    backend: B,
    parser: P,
    config: GeometryConfig,
}

impl<B: RenderBackend> ShapeFactory<B> {
    /// Factory that parses models with `tobj`
    pub fn new(backend: B, config: GeometryConfig) -> Self {
        Self::with_parser(backend, TobjParser, config)
    }
}

impl<B: RenderBackend, P: ModelParser> ShapeFactory<B, P> {
    /// Factory with a custom model parser
    pub fn with_parser(backend: B, parser: P, config: GeometryConfig) -> Self {
        Self { backend, parser, config }
    }

    /// Geometry configuration
    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Rendering backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable rendering backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consume the factory, returning the backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn segments(&self) -> Result<u32, GeometryError> {
        match self.config.radial_segments {
            segments if segments >= 3 => Ok(segments),
            segments => Err(GeometryError::InvalidParameter(format!(
                "radial_segments must be at least 3, got {segments}"
            ))),
        }
    }

    fn finish(&mut self, shape: &str, mut mesh: Mesh) -> Result<Mesh, GeometryError> {
        mesh.upload(&mut self.backend)?;
        log::debug!(
            "Generated {}: {} vertices, {} triangles",
            shape,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Cube of edge length `side`
    pub fn make_cube(&mut self, side: f32) -> Result<Mesh, GeometryError> {
        check_size("side", side)?;
        self.finish("cube", cube::cube(side))
    }

    /// Regular tetrahedron inscribed in a sphere of `radius`
    pub fn make_tetrahedron(&mut self, radius: f32) -> Result<Mesh, GeometryError> {
        check_size("radius", radius)?;
        self.finish("tetrahedron", tetrahedron::tetrahedron(radius))
    }

    /// Icosphere of `radius` after `tessellation` subdivision passes
    pub fn make_sphere(&mut self, radius: f32, tessellation: u32) -> Result<Mesh, GeometryError> {
        check_size("radius", radius)?;
        check_vertex_budget(icosphere::vertex_count(tessellation.min(16)))?;

        let seed = self.config.icosahedron_model.clone();
        let mut mesh = self.load_model(&seed, None)?;

        let subdivided = icosphere::subdivide(mesh.vertices(), mesh.indices(), radius, tessellation);
        let (vertices, indices) = match subdivided {
            Ok(geometry) => geometry,
            Err(e) => {
                mesh.release(&mut self.backend);
                return Err(e);
            }
        };
        mesh.replace_geometry(&mut self.backend, vertices, indices)?;

        log::debug!(
            "Generated sphere (r={}, level {}): {} vertices, {} triangles",
            radius,
            tessellation,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Ellipsoid with semi-axes `rx`, `ry`, `rz`
    pub fn make_ellipse(&mut self, rx: f32, ry: f32, rz: f32, tessellation: u32) -> Result<Mesh, GeometryError> {
        check_size("rx", rx)?;
        check_size("ry", ry)?;
        check_size("rz", rz)?;

        let mut mesh = self.make_sphere(1.0, tessellation)?;
        icosphere::scale_to_ellipsoid(mesh.vertices_mut(), Vec3::new(rx, ry, rz));
        if let Err(e) = mesh.upload(&mut self.backend) {
            mesh.release(&mut self.backend);
            return Err(e.into());
        }
        Ok(mesh)
    }

    /// Capped cylinder of `radius` and `length` along Z
    pub fn make_cylinder(&mut self, radius: f32, length: f32) -> Result<Mesh, GeometryError> {
        check_size("radius", radius)?;
        check_size("length", length)?;
        let segments = self.segments()?;
        check_vertex_budget(cylinder::vertex_count(length, segments))?;

        self.finish("cylinder", cylinder::cylinder(radius, length, segments))
    }

    /// Cone of base `radius` with its apex `length` up the Z axis
    pub fn make_cone(&mut self, radius: f32, length: f32) -> Result<Mesh, GeometryError> {
        check_size("radius", radius)?;
        check_size("length", length)?;
        let segments = self.segments()?;
        check_vertex_budget(cone::vertex_count(segments))?;

        self.finish("cone", cone::cone(radius, length, segments))
    }

    /// The configured torus model
    pub fn make_torus(&mut self) -> Result<Mesh, GeometryError> {
        let path = self.config.torus_model.clone();
        self.load_model(&path, None)
    }

    /// Load an external model, optionally textured
    ///
    /// A texture that cannot be loaded leaves the mesh untextured. The
    /// texture stays alive after the mesh is released; free it with
    /// [`ShapeFactory::destroy_texture`].
    pub fn load_model(&mut self, path: &Path, texture: Option<&Path>) -> Result<Mesh, GeometryError> {
        let mut mesh = load_mesh(&self.parser, path)?;

        if let Some(texture_path) = texture {
            match self.backend.create_texture(texture_path) {
                Some(handle) => mesh.set_texture(Some(handle)),
                None => log::warn!(
                    "Texture {} unavailable; {} stays untextured",
                    texture_path.display(),
                    path.display()
                ),
            }
        }

        if let Err(e) = mesh.upload(&mut self.backend) {
            if let Some(texture) = mesh.texture() {
                self.backend.destroy_texture(texture);
            }
            return Err(e.into());
        }
        Ok(mesh)
    }

    /// Free a texture attached by [`ShapeFactory::load_model`]
    pub fn destroy_texture(&mut self, texture: TextureHandle) {
        self.backend.destroy_texture(texture);
    }

    /// Destroy a mesh's buffers and clear its data
    pub fn release(&mut self, mesh: &mut Mesh) {
        mesh.release(&mut self.backend);
    }
}
