#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tilegrid_editor::render::{DecodedImage, ImageSource, RenderBackend, TextureHandle};
use tilegrid_editor::{DrawCommand, MapError};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves solid cyan images of fixed sizes keyed by path.
#[derive(Default)]
pub struct FakeImages {
    pub sizes: HashMap<PathBuf, (u32, u32)>,
    pub requested: Vec<PathBuf>,
}

impl FakeImages {
    pub fn with(mut self, path: impl Into<PathBuf>, w: u32, h: u32) -> Self {
        self.sizes.insert(path.into(), (w, h));
        self
    }
}

impl ImageSource for FakeImages {
    fn load_image(&mut self, path: &Path) -> Result<DecodedImage, MapError> {
        self.requested.push(path.to_path_buf());
        let (w, h) = *self.sizes.get(path).ok_or_else(|| MapError::AssetLoad {
            path: path.to_path_buf(),
            reason: "no such image".into(),
        })?;
        let pixels = [0u8, 255, 255, 255].repeat((w * h) as usize);
        DecodedImage::new(w, h, pixels)
    }
}

/// Records uploads and draws.
#[derive(Default)]
pub struct RecordingBackend {
    pub uploads: Vec<DecodedImage>,
    pub draws: Vec<DrawCommand>,
}

impl RenderBackend for RecordingBackend {
    fn upload_texture(&mut self, image: &DecodedImage) -> Result<TextureHandle, MapError> {
        self.uploads.push(image.clone());
        Ok(TextureHandle(self.uploads.len() as u32 - 1))
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<(), MapError> {
        self.draws.push(*command);
        Ok(())
    }
}
