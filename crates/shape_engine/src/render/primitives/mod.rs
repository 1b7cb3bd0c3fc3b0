//! Mesh primitives and their model transforms

pub mod mesh;
pub mod transform;

pub use mesh::{check_topology, DrawMode, Index, Mesh, TopologyError, Vertex, VertexAttribute, MAX_VERTICES};
pub use transform::ModelTransform;
