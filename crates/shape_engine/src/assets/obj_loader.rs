//! OBJ model loading
//!
//! Parsing is delegated to a [`ModelParser`]; this module turns the parsed
//! flat arrays into a [`Mesh`]. Colors cycle through the palette once per
//! triangle so imported models stay readable without textures.

use crate::assets::AssetError;
use crate::geometry::palette_color;
use crate::render::primitives::mesh::{check_topology, Index, Mesh, Vertex};
use std::path::Path;

/// Flat vertex arrays of a single parsed shape
///
/// Attributes are indexed by the same vertex index; `normals` and
/// `texcoords` are empty when the file does not provide them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedShape {
    /// Three floats per vertex
    pub positions: Vec<f32>,
    /// Three floats per vertex, or empty
    pub normals: Vec<f32>,
    /// Two floats per vertex, or empty
    pub texcoords: Vec<f32>,
    /// Triangle list
    pub indices: Vec<u32>,
}

impl ParsedShape {
    /// Number of vertices described by `positions`
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Source of parsed model data
pub trait ModelParser {
    /// Parse the model at `path`
    fn parse(&self, path: &Path) -> Result<ParsedShape, AssetError>;
}

/// [`ModelParser`] backed by the `tobj` crate
///
/// Faces are triangulated and attributes re-indexed to a single index list.
/// Only the first model in a file is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct TobjParser;

impl ModelParser for TobjParser {
    fn parse(&self, path: &Path) -> Result<ParsedShape, AssetError> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {}", path.display(), e)))?;

        let model_count = models.len();
        let Some(model) = models.into_iter().next() else {
            return Err(AssetError::LoadFailed(format!("{} contains no models", path.display())));
        };
        if model_count > 1 {
            log::debug!(
                "{} contains {} models; using '{}' only",
                path.display(),
                model_count,
                model.name
            );
        }

        let mesh = model.mesh;
        if mesh.positions.is_empty() {
            return Err(AssetError::LoadFailed(format!("{} contains no geometry", path.display())));
        }
        Ok(ParsedShape {
            positions: mesh.positions,
            normals: mesh.normals,
            texcoords: mesh.texcoords,
            indices: mesh.indices,
        })
    }
}

/// Convert parsed arrays into a mesh
///
/// Normals default to zero and texture coordinates to `(0, 0)` when absent.
/// The V texture coordinate is flipped to a top-left origin.
pub fn mesh_from_parsed(shape: &ParsedShape) -> Result<Mesh, AssetError> {
    let vertex_count = shape.vertex_count();

    if shape.positions.len() % 3 != 0 {
        return Err(AssetError::InvalidData(format!(
            "{} position components is not a whole number of vertices",
            shape.positions.len()
        )));
    }
    if !shape.normals.is_empty() && shape.normals.len() != shape.positions.len() {
        return Err(AssetError::InvalidData(format!(
            "{} normal components for {} vertices",
            shape.normals.len(),
            vertex_count
        )));
    }
    if !shape.texcoords.is_empty() && shape.texcoords.len() != vertex_count * 2 {
        return Err(AssetError::InvalidData(format!(
            "{} texture coordinate components for {} vertices",
            shape.texcoords.len(),
            vertex_count
        )));
    }
    check_topology(vertex_count, shape.indices.iter().copied())
        .map_err(|e| AssetError::InvalidData(e.to_string()))?;

    let vertices = (0..vertex_count)
        .map(|i| {
            let position = [shape.positions[3 * i], shape.positions[3 * i + 1], shape.positions[3 * i + 2]];
            let normal = if shape.normals.is_empty() {
                [0.0; 3]
            } else {
                [shape.normals[3 * i], shape.normals[3 * i + 1], shape.normals[3 * i + 2]]
            };
            let tex_coord = if shape.texcoords.is_empty() {
                [0.0; 2]
            } else {
                [shape.texcoords[2 * i], 1.0 - shape.texcoords[2 * i + 1]]
            };
            Vertex::new(position, palette_color(i / 3), normal, tex_coord)
        })
        .collect();

    // check_topology bounded every index below MAX_VERTICES
    let indices = shape.indices.iter().map(|&i| i as Index).collect();

    Ok(Mesh::from_geometry(vertices, indices))
}

/// Parse `path` with `parser` and build a mesh from it
///
/// Failures are logged and returned; a partially built mesh is never
/// produced.
pub fn load_mesh<P: ModelParser + ?Sized>(parser: &P, path: &Path) -> Result<Mesh, AssetError> {
    let result = parser.parse(path).and_then(|shape| mesh_from_parsed(&shape));
    match &result {
        Ok(mesh) => log::info!(
            "Loaded model {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        ),
        Err(e) => log::error!("Failed to load model {}: {}", path.display(), e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::COLORS;
    use crate::render::primitives::mesh::MAX_VERTICES;
    use approx::assert_relative_eq;

    const QUAD_OBJ: &str = "\
o quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    struct FailingParser;

    impl ModelParser for FailingParser {
        fn parse(&self, path: &Path) -> Result<ParsedShape, AssetError> {
            Err(AssetError::LoadFailed(format!("cannot read {}", path.display())))
        }
    }

    fn write_obj(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.obj");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_tobj_triangulates_quad() {
        let (_dir, path) = write_obj(QUAD_OBJ);
        let mesh = load_mesh(&TobjParser, &path).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for vertex in mesh.vertices() {
            assert_relative_eq!(vertex.normal[2], 1.0);
        }
    }

    #[test]
    fn test_texcoords_are_flipped() {
        let (_dir, path) = write_obj(QUAD_OBJ);
        let mesh = load_mesh(&TobjParser, &path).unwrap();

        let first = mesh.vertex(0).unwrap();
        assert_relative_eq!(first.tex_coord[0], 0.0);
        assert_relative_eq!(first.tex_coord[1], 1.0);
    }

    #[test]
    fn test_missing_attributes_use_placeholders() {
        let shape = ParsedShape {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        let mesh = mesh_from_parsed(&shape).unwrap();

        for vertex in mesh.vertices() {
            assert_eq!(vertex.normal, [0.0; 3]);
            assert_eq!(vertex.tex_coord, [0.0; 2]);
        }
    }

    #[test]
    fn test_color_changes_once_per_triangle() {
        let shape = ParsedShape {
            positions: vec![0.0; 3 * 7],
            indices: vec![0, 1, 2, 3, 4, 5],
            ..Default::default()
        };
        let mesh = mesh_from_parsed(&shape).unwrap();
        let colors: Vec<[f32; 3]> = mesh.vertices().iter().map(|v| v.color).collect();

        assert_eq!(colors[0], COLORS[0]);
        assert_eq!(colors[2], COLORS[0]);
        assert_eq!(colors[3], COLORS[1]);
        assert_eq!(colors[6], COLORS[2]);
    }

    #[test]
    fn test_out_of_range_index_is_invalid_data() {
        let shape = ParsedShape {
            positions: vec![0.0; 9],
            indices: vec![0, 1, 3],
            ..Default::default()
        };
        assert!(matches!(mesh_from_parsed(&shape), Err(AssetError::InvalidData(_))));
    }

    #[test]
    fn test_oversized_model_is_rejected() {
        let shape = ParsedShape {
            positions: vec![0.0; 3 * (MAX_VERTICES + 1)],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        assert!(matches!(mesh_from_parsed(&shape), Err(AssetError::InvalidData(_))));
    }

    #[test]
    fn test_mismatched_normals_rejected() {
        let shape = ParsedShape {
            positions: vec![0.0; 9],
            normals: vec![0.0; 3],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        assert!(matches!(mesh_from_parsed(&shape), Err(AssetError::InvalidData(_))));
    }

    #[test]
    fn test_parser_error_yields_err() {
        let result = load_mesh(&FailingParser, Path::new("broken.obj"));
        assert!(matches!(result, Err(AssetError::LoadFailed(_))));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = load_mesh(&TobjParser, Path::new("no/such/model.obj"));
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_file_without_faces_has_no_models() {
        let (_dir, path) = write_obj("# empty\n");
        let result = load_mesh(&TobjParser, &path);
        assert!(matches!(result, Err(AssetError::LoadFailed(_))));
    }
}
