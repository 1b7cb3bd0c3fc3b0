//! Procedural geometry
//!
//! Parametric generators for the primitive shapes, the icosphere
//! subdivision engine and the [`ShapeFactory`] that ties them to model
//! loading and buffer upload.

pub mod cone;
pub mod cube;
pub mod cylinder;
pub mod factory;
pub mod icosphere;
pub mod tetrahedron;

pub use factory::ShapeFactory;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::render::RenderError;
use thiserror::Error;

/// Face colors, cycled across faces and segments
pub const COLORS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Palette color for face or segment `i`
pub fn palette_color(i: usize) -> [f32; 3] {
    COLORS[i % COLORS.len()]
}

/// Errors raised while building a shape
#[derive(Error, Debug)]
pub enum GeometryError {
    /// Loading a seed or external model failed
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// The backend could not create the mesh buffers
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Geometry configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The shape needs more vertices than a 16-bit index can address
    #[error("{0} vertices exceed the 16-bit index limit")]
    TooManyVertices(usize),

    /// A size or count parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
