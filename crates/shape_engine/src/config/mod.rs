//! Configuration system
//!
//! Configuration types serialize to TOML or RON, chosen by file extension.

pub use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Load configuration from file, falling back to defaults if the file is absent
    fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Default number of segments around cylinders and cones
pub const DEFAULT_RADIAL_SEGMENTS: u32 = 20;

const ICOSAHEDRON_MODEL: &str = "icosahedron.obj";
const TORUS_MODEL: &str = "torus.obj";

/// # Geometry Configuration
///
/// Locations of the models the shape factory seeds from, and the tessellation
/// of revolved shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Unit icosahedron used as the base of spheres and ellipsoids
    pub icosahedron_model: PathBuf,
    /// Model returned by `make_torus`
    pub torus_model: PathBuf,
    /// Segments around the axis of cylinders and cones
    pub radial_segments: u32,
}

impl GeometryConfig {
    /// Create a configuration with explicit model paths
    pub fn new(icosahedron_model: impl Into<PathBuf>, torus_model: impl Into<PathBuf>) -> Self {
        Self {
            icosahedron_model: icosahedron_model.into(),
            torus_model: torus_model.into(),
            radial_segments: DEFAULT_RADIAL_SEGMENTS,
        }
    }

    /// Create a configuration with automatic model path resolution
    ///
    /// This tries multiple common locations for meshes, useful for applications
    /// that might be run from different working directories.
    pub fn with_path_resolution() -> Self {
        let mesh_dirs = [
            "resources/meshes/",
            "res/meshes/",
            "../resources/meshes/",
            "../../resources/meshes/",
            "./",
        ];

        let resolve = |file: &str| {
            mesh_dirs
                .iter()
                .map(|dir| Path::new(dir).join(file))
                .find(|candidate| candidate.exists())
                .unwrap_or_else(|| Path::new("resources/meshes").join(file))
        };

        Self::new(resolve(ICOSAHEDRON_MODEL), resolve(TORUS_MODEL))
    }

    /// Set the number of radial segments
    pub fn with_radial_segments(mut self, segments: u32) -> Self {
        self.radial_segments = segments;
        self
    }

    /// Validate that the configuration is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.radial_segments < 3 {
            return Err(format!("radial_segments must be at least 3, got {}", self.radial_segments));
        }
        if !self.icosahedron_model.exists() {
            return Err(format!("Icosahedron model not found: {}", self.icosahedron_model.display()));
        }
        if !self.torus_model.exists() {
            return Err(format!("Torus model not found: {}", self.torus_model.display()));
        }
        Ok(())
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self::with_path_resolution()
    }
}

impl Config for GeometryConfig {}
