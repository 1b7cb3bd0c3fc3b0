//! Texture image decoding

use crate::assets::AssetError;
use std::path::Path;

/// Decoded RGBA8 image ready for texture upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data, row major
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Bytes per pixel of the decoded data
    pub const CHANNELS: usize = 4;

    /// Decode an image file, converting it to RGBA8
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        log::debug!("Loading image from: {:?}", path);
        let rgba = image::open(path)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image {}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!("Loaded image {}x{} from {:?}", width, height, path);
        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// RGBA value of the pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        let px = self.data.get(start..start + Self::CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
