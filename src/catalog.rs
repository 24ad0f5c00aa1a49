use crate::atlas::Atlas;
use crate::command::DrawCommand;
use crate::error::MapError;
use crate::geom::Region;

/// Catalog-wide sprite id. Dense, starting at 0, in atlas-load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteId(pub u32);

/// Index of an atlas inside a [`SpriteCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasId(pub usize);

/// One addressable cell of an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Catalog-wide id.
    pub id: SpriteId,
    /// Atlas the sprite was cut from.
    pub atlas: AtlasId,
    /// Cell index within the atlas.
    pub cell: usize,
    /// Source rectangle inside the atlas image.
    pub region: Region,
}

/// Every loaded atlas plus the flat list of sprites cut from them.
///
/// Only [`crate::SpriteDatabaseLoader`] fills a catalog; afterwards it is
/// read-only.
#[derive(Debug, Default)]
pub struct SpriteCatalog {
    atlases: Vec<Atlas>,
    sprites: Vec<Sprite>,
}

impl SpriteCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an atlas and gives its first `limit` cells the next free ids.
    /// Returns how many sprites were added.
    pub(crate) fn push_atlas(&mut self, atlas: Atlas, limit: usize) -> usize {
        let atlas_id = AtlasId(self.atlases.len());
        let before = self.sprites.len();
        for (cell, region) in atlas.cell_regions().iter().take(limit).enumerate() {
            let id = SpriteId(self.sprites.len() as u32);
            self.sprites.push(Sprite {
                id,
                atlas: atlas_id,
                cell,
                region: *region,
            });
        }
        self.atlases.push(atlas);
        self.sprites.len() - before
    }

    /// Number of valid sprites; ids run from 0 to `count() - 1`.
    pub fn count(&self) -> usize {
        self.sprites.len()
    }

    /// `true` before any atlas is loaded.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprites in id order.
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Atlases in load order.
    pub fn atlases(&self) -> &[Atlas] {
        &self.atlases
    }

    /// Sprite with id `id`.
    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.0 as usize)
    }

    /// Atlas with id `id`.
    pub fn atlas(&self, id: AtlasId) -> Option<&Atlas> {
        self.atlases.get(id.0)
    }

    /// Atlas a sprite was cut from.
    pub fn atlas_of(&self, sprite: &Sprite) -> Option<&Atlas> {
        self.atlas(sprite.atlas)
    }

    /// Draw command placing sprite `id` unscaled with its top-left corner at
    /// `(x, y)`.
    pub fn draw_sprite(&self, id: SpriteId, x: u32, y: u32) -> Result<DrawCommand, MapError> {
        self.draw_sprite_into(id, Region::default().at(x, y), true)
    }

    /// Draw command stretching sprite `id` over `dest`.
    pub(crate) fn draw_sprite_into(
        &self,
        id: SpriteId,
        dest: Region,
        native_size: bool,
    ) -> Result<DrawCommand, MapError> {
        let sprite = self
            .sprite(id)
            .ok_or_else(|| MapError::OutOfRange(format!("sprite id {} of {}", id.0, self.count())))?;
        let atlas = self
            .atlas_of(sprite)
            .ok_or_else(|| MapError::OutOfRange(format!("atlas {}", sprite.atlas.0)))?;
        let dest = if native_size {
            Region::new(dest.x, dest.y, sprite.region.width, sprite.region.height)
        } else {
            dest
        };
        Ok(DrawCommand {
            texture: atlas.texture(),
            src: sprite.region,
            dest,
        })
    }

    /// Lays out every cell of one atlas at its own source position, for a
    /// palette view of the whole sheet.
    pub fn atlas_preview(&self, id: AtlasId) -> Result<Vec<DrawCommand>, MapError> {
        let atlas = self
            .atlas(id)
            .ok_or_else(|| MapError::OutOfRange(format!("atlas {} of {}", id.0, self.atlases.len())))?;
        Ok(atlas
            .cell_regions()
            .iter()
            .map(|&region| DrawCommand {
                texture: atlas.texture(),
                src: region,
                dest: region,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextureHandle;

    fn catalog() -> SpriteCatalog {
        let mut c = SpriteCatalog::new();
        c.push_atlas(
            Atlas::new("a.png", 32, 32, 16, 16, TextureHandle(0)).expect("atlas"),
            25,
        );
        c.push_atlas(
            Atlas::new("b.png", 48, 16, 16, 16, TextureHandle(1)).expect("atlas"),
            2,
        );
        c
    }

    #[test]
    fn ids_continue_across_atlases() {
        let c = catalog();
        assert_eq!(c.count(), 4 + 2);
        let ids: Vec<u32> = c.sprites().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        let s = c.sprite(SpriteId(5)).expect("sprite");
        assert_eq!(s.atlas, AtlasId(1));
        assert_eq!(s.cell, 1);
        assert_eq!(s.region, Region::new(16, 0, 16, 16));
    }

    #[test]
    fn draw_sprite_uses_atlas_texture_and_native_size() {
        let c = catalog();
        let cmd = c.draw_sprite(SpriteId(4), 100, 50).expect("draw");
        assert_eq!(cmd.texture, TextureHandle(1));
        assert_eq!(cmd.src, Region::new(0, 0, 16, 16));
        assert_eq!(cmd.dest, Region::new(100, 50, 16, 16));
    }

    #[test]
    fn unknown_sprite_is_out_of_range() {
        assert!(matches!(
            catalog().draw_sprite(SpriteId(6), 0, 0),
            Err(MapError::OutOfRange(_))
        ));
    }

    #[test]
    fn preview_covers_every_cell() {
        let c = catalog();
        let cmds = c.atlas_preview(AtlasId(1)).expect("preview");
        assert_eq!(cmds.len(), 3);
        assert!(cmds.iter().all(|cmd| cmd.src == cmd.dest));
        assert!(c.atlas_preview(AtlasId(2)).is_err());
    }
}
