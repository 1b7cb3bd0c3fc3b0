//! Asset loading
//!
//! Reads externally authored models and textures from disk and converts
//! them into the crate's mesh and image types.

pub mod image_loader;
pub mod obj_loader;

pub use image_loader::ImageData;
pub use obj_loader::{ModelParser, ParsedShape, TobjParser};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
