use super::{DecodedImage, ImageSource, RenderBackend, TextureHandle};
use crate::command::DrawCommand;
use crate::error::MapError;
use macroquad::prelude::*;
use std::path::Path;

/// Decodes atlas files with macroquad's image loader. Needs no window.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacroquadImageLoader;

/// Uploads atlases as macroquad textures and draws through its
/// immediate-mode renderer.
///
/// Uploading and drawing need the macroquad window context, so the backend
/// must live inside the `#[macroquad::main]` task.
#[derive(Default)]
pub struct MacroquadBackend {
    textures: Vec<Texture2D>,
}

impl MacroquadBackend {
    /// Backend with no textures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture behind a handle.
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture2D> {
        self.textures.get(handle.0 as usize)
    }
}

impl ImageSource for MacroquadImageLoader {
    fn load_image(&mut self, path: &Path) -> Result<DecodedImage, MapError> {
        let bytes = std::fs::read(path).map_err(|e| MapError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let img = Image::from_file_with_format(&bytes, None).map_err(|e| MapError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        DecodedImage::from_decoder(path, img.width as u32, img.height as u32, img.bytes)
    }
}

impl RenderBackend for MacroquadBackend {
    fn upload_texture(&mut self, image: &DecodedImage) -> Result<TextureHandle, MapError> {
        let (w, h) = match (u16::try_from(image.width), u16::try_from(image.height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(MapError::OutOfRange(format!(
                    "{}x{} image exceeds the texture size limit",
                    image.width, image.height
                )))
            }
        };
        let tex = Texture2D::from_rgba8(w, h, &image.pixels);
        tex.set_filter(FilterMode::Nearest);

        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(tex);
        Ok(handle)
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<(), MapError> {
        let tex = self.texture(command.texture).ok_or_else(|| {
            MapError::OutOfRange(format!("texture handle {}", command.texture.0))
        })?;

        draw_texture_ex(
            tex,
            command.dest.x as f32,
            command.dest.y as f32,
            WHITE,
            DrawTextureParams {
                source: Some(command.src.into()),
                dest_size: Some(vec2(command.dest.width as f32, command.dest.height as f32)),
                ..Default::default()
            },
        );
        Ok(())
    }
}
