//! Decoded source images.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::{Result, StippleError};

/// A decoded RGBA image, read-only once produced.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    /// Wrap an already-decoded image.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Decode an image file.
    ///
    /// Unreadable or undecodable files come back as [`StippleError::Decode`]
    /// so the caller can report them and carry on.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| StippleError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::from_rgba(img.to_rgba8()))
    }

    /// Decode an in-memory image, guessing the format from its header.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| StippleError::Decode {
            path: "<memory>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_rgba(img.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Resample to `width` x `height`, the way a canvas scales an image on draw.
    pub fn resized(&self, width: u32, height: u32) -> RgbaImage {
        if (width, height) == self.pixels.dimensions() {
            return self.pixels.clone();
        }
        imageops::resize(&self.pixels, width, height, FilterType::Triangle)
    }
}
