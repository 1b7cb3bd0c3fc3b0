//! # Shape Engine
//!
//! Procedural mesh generation and model transforms for real-time rendering.
//!
//! ## Features
//!
//! - **Primitives**: cube, tetrahedron, cylinder and cone generators
//! - **Icosphere**: recursive subdivision with a shared midpoint cache
//! - **Model Loading**: OBJ import into the same mesh format
//! - **Transforms**: lazily composed `revolve · translate · rotate · scale`
//! - **Backend Agnostic**: meshes upload through the [`render::RenderBackend`] hook
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shape_engine::prelude::*;
//!
//! fn main() -> Result<(), GeometryError> {
//!     let mut factory = ShapeFactory::new(HeadlessBackend::new(), GeometryConfig::default());
//!
//!     let mut sphere = factory.make_sphere(1.0, 2)?;
//!     sphere.translate(Vec3::new(6.0, 0.0, 0.0));
//!     sphere.revolve(0.5, Vec3::y());
//!     let _model = sphere.transform();
//!
//!     factory.release(&mut sphere);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod geometry;
pub mod render;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ModelParser, ParsedShape, TobjParser},
        config::{Config, ConfigError, GeometryConfig},
        foundation::math::{Mat4, Vec3},
        geometry::{GeometryError, ShapeFactory, COLORS},
        render::{
            DrawMode, HeadlessBackend, Mesh, MeshBuffers, ModelTransform, RenderBackend, RenderError,
            TextureHandle, Vertex,
        },
    };
}
