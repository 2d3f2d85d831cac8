//! Image decoding and encoding for textures

use std::io::Cursor;

use image::RgbaImage;

use crate::error::{GraphicsError, GraphicsResult};

/// Container used when saving a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Bmp,
}

impl ImageFormat {
    /// `.png` paths save as PNG, everything else as BMP.
    pub fn from_path(path: &str) -> Self {
        let is_png = path
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("png"));
        if is_png { Self::Png } else { Self::Bmp }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Decode an encoded image into RGBA8 pixels.
pub fn decode(bytes: &[u8]) -> GraphicsResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| GraphicsError::Resource(format!("failed to decode image: {e}")))?;
    Ok(img.to_rgba8())
}

/// Encode RGBA8 pixels.
pub fn encode(pixels: &RgbaImage, format: ImageFormat) -> GraphicsResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    pixels
        .write_to(&mut out, format.to_image_format())
        .map_err(|e| GraphicsError::Resource(format!("failed to encode image: {e}")))?;
    Ok(out.into_inner())
}
