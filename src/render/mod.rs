//! Seams to the outside world: image decoding in, draw commands out.

mod macroquad_backend;

pub use macroquad_backend::{MacroquadBackend, MacroquadImageLoader};

use crate::command::DrawCommand;
use crate::error::MapError;
use std::path::Path;

/// Opaque texture id handed out by a [`RenderBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height` RGBA quadruplets, row-major.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wraps a pixel buffer, checking that it holds `width * height` RGBA pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, MapError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(MapError::OutOfRange(format!(
                "pixel buffer of {} bytes for a {width}x{height} RGBA image (expected {expected})",
                pixels.len()
            )));
        }
        Ok(DecodedImage {
            width,
            height,
            pixels,
        })
    }

    /// Wraps pixels produced by an image decoder for the file at `path`.
    /// A buffer of the wrong size means the decode failed, so it is reported
    /// as [`MapError::AssetLoad`].
    pub fn from_decoder(path: &Path, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, MapError> {
        DecodedImage::new(width, height, pixels).map_err(|e| MapError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Makes every pixel whose RGB equals `key` fully transparent.
    /// Returns how many pixels were keyed out.
    pub fn apply_color_key(&mut self, key: [u8; 3]) -> usize {
        let mut keyed = 0;
        for px in self.pixels.chunks_exact_mut(4) {
            if px[..3] == key {
                px[3] = 0;
                keyed += 1;
            }
        }
        keyed
    }
}

/// Image-loading collaborator.
pub trait ImageSource {
    /// Decodes the image at `path`. Unreadable or undecodable files are
    /// reported as [`MapError::AssetLoad`].
    fn load_image(&mut self, path: &Path) -> Result<DecodedImage, MapError>;
}

/// Rendering collaborator. Presenting the frame is left to the host loop.
pub trait RenderBackend {
    /// Turns decoded pixels into a texture the backend can draw from.
    fn upload_texture(&mut self, image: &DecodedImage) -> Result<TextureHandle, MapError>;

    /// Queues one textured quad.
    fn draw(&mut self, command: &DrawCommand) -> Result<(), MapError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_pixel_buffer() {
        assert!(matches!(
            DecodedImage::new(2, 2, vec![0; 15]),
            Err(MapError::OutOfRange(_))
        ));
    }

    #[test]
    fn wrong_size_decoder_output_is_asset_load() {
        let err = DecodedImage::from_decoder(Path::new("atlas/a.png"), 2, 2, vec![0; 12]).unwrap_err();
        match err {
            MapError::AssetLoad { path, .. } => assert_eq!(path, Path::new("atlas/a.png")),
            other => panic!("expected AssetLoad, got {other:?}"),
        }
        assert!(DecodedImage::from_decoder(Path::new("a.png"), 1, 1, vec![0; 4]).is_ok());
    }

    #[test]
    fn color_key_clears_alpha_of_matching_pixels_only() {
        let mut img = DecodedImage::new(
            3,
            1,
            vec![0, 255, 255, 255, 10, 20, 30, 255, 0, 255, 255, 128],
        )
        .expect("image");
        assert_eq!(img.apply_color_key([0, 255, 255]), 2);
        assert_eq!(img.pixels[3], 0);
        assert_eq!(img.pixels[7], 255);
        assert_eq!(img.pixels[11], 0);
    }
}
