use crate::error::MapError;
use crate::geom::Region;
use crate::render::TextureHandle;
use std::path::{Path, PathBuf};

/// Cuts a `pixel_width` x `pixel_height` image into `cell_width` x
/// `cell_height` regions, row-major from the top-left corner.
///
/// Pixels past the last whole cell on either axis are dropped.
pub fn slice(
    pixel_width: u32,
    pixel_height: u32,
    cell_width: u32,
    cell_height: u32,
) -> Result<Vec<Region>, MapError> {
    if cell_width == 0 || cell_height == 0 {
        return Err(MapError::InvalidGeometry {
            what: "atlas cell",
            width: cell_width,
            height: cell_height,
        });
    }

    let cols = pixel_width / cell_width;
    let rows = pixel_height / cell_height;

    let mut cells = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            cells.push(Region::new(
                col * cell_width,
                row * cell_height,
                cell_width,
                cell_height,
            ));
        }
    }
    Ok(cells)
}

/// One decoded spritesheet, cut into a regular grid of cells.
#[derive(Debug, Clone)]
pub struct Atlas {
    source_path: PathBuf,
    pixel_width: u32,
    pixel_height: u32,
    cell_width: u32,
    cell_height: u32,
    cell_regions: Vec<Region>,
    texture: TextureHandle,
}

impl Atlas {
    /// Slices an image of the given size and binds it to an uploaded texture.
    pub fn new(
        source_path: impl Into<PathBuf>,
        pixel_width: u32,
        pixel_height: u32,
        cell_width: u32,
        cell_height: u32,
        texture: TextureHandle,
    ) -> Result<Self, MapError> {
        let cell_regions = slice(pixel_width, pixel_height, cell_width, cell_height)?;
        Ok(Atlas {
            source_path: source_path.into(),
            pixel_width,
            pixel_height,
            cell_width,
            cell_height,
            cell_regions,
            texture,
        })
    }

    /// Image the atlas was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Image size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixel_width, self.pixel_height)
    }

    /// Cell size in pixels.
    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }

    /// Cells in row-major order.
    pub fn cell_regions(&self) -> &[Region] {
        &self.cell_regions
    }

    /// Region of cell `index`, if the atlas has that many cells.
    pub fn cell(&self, index: usize) -> Option<Region> {
        self.cell_regions.get(index).copied()
    }

    /// Texture the rendering backend handed out for this image.
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }
}
