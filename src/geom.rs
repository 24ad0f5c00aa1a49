use macroquad::math::Rect;

/// Integer pixel rectangle: a cell of an atlas image or a tile's footprint
/// on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Builds a region from its origin and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// Same size, moved to `(x, y)`.
    pub const fn at(self, x: u32, y: u32) -> Self {
        Region { x, y, ..self }
    }

    /// `true` if the pixel `(px, py)` lies inside.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && py >= self.y && px - self.x < self.width && py - self.y < self.height
    }
}

impl From<Region> for Rect {
    fn from(r: Region) -> Self {
        Rect::new(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
    }
}
