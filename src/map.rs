use crate::catalog::{SpriteCatalog, SpriteId};
use crate::command::DrawCommand;
use crate::error::MapError;
use crate::geom::Region;
use crate::render::RenderBackend;
use crate::Diagnostics;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// What a tile does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TileKind {
    /// Shows one sprite.
    #[default]
    StaticSprite,
    /// Cycles through the inclusive sprite id window `start..=end`.
    RangedSprite {
        /// First frame.
        start: SpriteId,
        /// Last frame.
        end: SpriteId,
    },
    /// Trigger cell, not drawn.
    Event,
    /// Blocking cell, not drawn.
    Collision,
}

/// Rich view of one grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile {
    /// Footprint on screen, set by [`Map::init_tile_geometry`].
    pub region: Region,
    /// Sprite shown by the tile, if any.
    pub sprite_id: Option<SpriteId>,
    /// Behaviour of the cell.
    pub kind: TileKind,
}

impl Tile {
    /// A tile showing `sprite`.
    pub fn sprite(sprite: SpriteId) -> Self {
        Tile {
            sprite_id: Some(sprite),
            ..Tile::default()
        }
    }

    /// An animated tile. `start` also becomes the tile's sprite.
    pub fn ranged(start: SpriteId, end: SpriteId) -> Self {
        Tile {
            sprite_id: Some(start),
            kind: TileKind::RangedSprite { start, end },
            ..Tile::default()
        }
    }

    /// Animation window, only for [`TileKind::RangedSprite`].
    pub fn range(&self) -> Option<RangeInclusive<u32>> {
        match self.kind {
            TileKind::RangedSprite { start, end } => Some(start.0.min(end.0)..=start.0.max(end.0)),
            _ => None,
        }
    }

    /// Sprite to draw at animation tick `tick`, or `None` for tiles that are
    /// not drawn.
    pub fn frame(&self, tick: u64) -> Option<SpriteId> {
        match self.kind {
            TileKind::StaticSprite => self.sprite_id,
            TileKind::RangedSprite { start, end } => {
                let (lo, hi) = (start.0.min(end.0), start.0.max(end.0));
                let len = u64::from(hi - lo) + 1;
                Some(SpriteId(lo + (tick % len) as u32))
            }
            TileKind::Event | TileKind::Collision => None,
        }
    }
}

/// Raw layer value for a sprite: 0 is an empty cell, `n` is sprite `n - 1`.
/// `SpriteId(u32::MAX)` has no raw value.
pub fn sprite_to_raw(sprite: Option<SpriteId>) -> Result<u32, MapError> {
    match sprite {
        None => Ok(0),
        Some(s) => s
            .0
            .checked_add(1)
            .ok_or_else(|| MapError::OutOfRange(format!("sprite id {} has no raw value", s.0))),
    }
}

/// Inverse of [`sprite_to_raw`].
pub fn raw_to_sprite(raw: u32) -> Option<SpriteId> {
    raw.checked_sub(1).map(SpriteId)
}

// One arena slot carries both the persisted raw value and the derived tile
// state, so the two views can never disagree in shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) raw: u32,
    region: Region,
    kind: TileKind,
}

impl Cell {
    fn tile(&self) -> Tile {
        Tile {
            region: self.region,
            sprite_id: raw_to_sprite(self.raw),
            kind: self.kind,
        }
    }
}

/// Printable summary of a map's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapMetadata {
    /// Columns per row.
    pub cols: u32,
    /// Rows per layer.
    pub rows: u32,
    /// Number of layers.
    pub layer_count: u32,
    /// Sprite width in pixels.
    pub sprite_width: u32,
    /// Sprite height in pixels.
    pub sprite_height: u32,
    /// Map name, also its directory and file stem.
    pub name: String,
}

impl fmt::Display for MapMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "width: {}", self.cols)?;
        writeln!(f, "height: {}", self.rows)?;
        writeln!(f, "layers: {}", self.layer_count)?;
        writeln!(f, "sprite_width: {}", self.sprite_width)?;
        writeln!(f, "sprite_height: {}", self.sprite_height)?;
        write!(f, "name: {}", self.name)
    }
}

/// Layered tile grid.
///
/// Cells live in one arena laid out `[layer][row][col]`; both the raw value
/// view ([`Map::raw`]) and the tile view ([`Map::tile`]) read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    name: String,
    storage_path: Option<PathBuf>,
    cols: u32,
    rows: u32,
    layer_count: u32,
    sprite_width: u32,
    sprite_height: u32,
    tile_width: u32,
    tile_height: u32,
    map_width: u32,
    map_height: u32,
    cells: Vec<Cell>,
}

impl Map {
    /// Allocates a `layer_count` x `rows` x `cols` map with every raw value 0
    /// and every tile a default [`TileKind::StaticSprite`] with no sprite.
    ///
    /// Sprite size equals tile size. Tile regions stay zeroed until
    /// [`Map::init_tile_geometry`] runs.
    pub fn create(
        cols: u32,
        rows: u32,
        layer_count: u32,
        tile_width: u32,
        tile_height: u32,
        name: &str,
        diag: Diagnostics,
    ) -> Result<Self, MapError> {
        diag.step(format_args!("creating map '{name}'"));

        if tile_width == 0 || tile_height == 0 {
            return Err(MapError::InvalidGeometry {
                what: "map tile",
                width: tile_width,
                height: tile_height,
            });
        }
        if cols == 0 || rows == 0 || layer_count == 0 {
            return Err(MapError::InvalidMap(format!(
                "map '{name}' needs at least one column, row and layer (got {cols}x{rows}x{layer_count})"
            )));
        }
        validate_name(name)?;

        let too_big = || MapError::InvalidMap(format!("map '{name}' is too large"));
        let map_width = tile_width.checked_mul(cols).ok_or_else(too_big)?;
        let map_height = tile_height.checked_mul(rows).ok_or_else(too_big)?;
        let tile_count = (layer_count as usize)
            .checked_mul(rows as usize)
            .and_then(|n| n.checked_mul(cols as usize))
            .ok_or_else(too_big)?;

        diag.step(format_args!("map.w = {map_width} map.h = {map_height}"));
        diag.step(format_args!("map.tile_count = {tile_count}"));

        Ok(Map {
            name: name.to_owned(),
            storage_path: None,
            cols,
            rows,
            layer_count,
            sprite_width: tile_width,
            sprite_height: tile_height,
            tile_width,
            tile_height,
            map_width,
            map_height,
            cells: vec![Cell::default(); tile_count],
        })
    }

    /// Map name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the map was last saved to or loaded from.
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    pub(crate) fn set_storage_path(&mut self, path: PathBuf) {
        self.storage_path = Some(path);
    }

    /// Columns per row.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Rows per layer.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of layers.
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Sprite width in pixels.
    pub fn sprite_width(&self) -> u32 {
        self.sprite_width
    }

    /// Sprite height in pixels.
    pub fn sprite_height(&self) -> u32 {
        self.sprite_height
    }

    /// Tile width in pixels.
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height in pixels.
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// `tile_width * cols`.
    pub fn map_width(&self) -> u32 {
        self.map_width
    }

    /// `tile_height * rows`.
    pub fn map_height(&self) -> u32 {
        self.map_height
    }

    /// `layer_count * rows * cols`.
    pub fn tile_count(&self) -> usize {
        self.layer_count as usize * self.rows as usize * self.cols as usize
    }

    /// Header fields for printing or comparison.
    pub fn metadata(&self) -> MapMetadata {
        MapMetadata {
            cols: self.cols,
            rows: self.rows,
            layer_count: self.layer_count,
            sprite_width: self.sprite_width,
            sprite_height: self.sprite_height,
            name: self.name.clone(),
        }
    }

    #[inline]
    fn offset(&self, layer: u32, row: u32, col: u32) -> Result<usize, MapError> {
        if layer >= self.layer_count || row >= self.rows || col >= self.cols {
            return Err(MapError::OutOfRange(format!(
                "cell [{layer}][{row}][{col}] outside {}x{}x{} grid",
                self.layer_count, self.rows, self.cols
            )));
        }
        let offset = (layer as usize * self.rows as usize + row as usize) * self.cols as usize
            + col as usize;
        if offset >= self.cells.len() {
            return Err(MapError::OutOfRange(format!(
                "cell [{layer}][{row}][{col}] in unallocated grid"
            )));
        }
        Ok(offset)
    }

    /// Raw layer value at `[layer][row][col]`.
    pub fn raw(&self, layer: u32, row: u32, col: u32) -> Result<u32, MapError> {
        Ok(self.cells[self.offset(layer, row, col)?].raw)
    }

    /// Overwrites a raw layer value; the tile view's sprite follows it.
    ///
    /// A cell whose kind no longer fits the new value (an event or collision
    /// cell given a sprite, a ranged cell moved outside its window or
    /// emptied) becomes a plain [`TileKind::StaticSprite`].
    pub fn set_raw(&mut self, layer: u32, row: u32, col: u32, raw: u32) -> Result<(), MapError> {
        let i = self.offset(layer, row, col)?;
        let cell = &mut self.cells[i];
        cell.raw = raw;
        let keeps_kind = match (cell.kind, raw_to_sprite(raw)) {
            (TileKind::StaticSprite, _) => true,
            (TileKind::RangedSprite { start, end }, Some(s)) => {
                (start.0.min(end.0)..=start.0.max(end.0)).contains(&s.0)
            }
            (TileKind::RangedSprite { .. }, None) => false,
            (TileKind::Event | TileKind::Collision, sprite) => sprite.is_none(),
        };
        if !keeps_kind {
            cell.kind = TileKind::StaticSprite;
        }
        Ok(())
    }

    /// Tile view of `[layer][row][col]`.
    pub fn tile(&self, layer: u32, row: u32, col: u32) -> Result<Tile, MapError> {
        Ok(self.cells[self.offset(layer, row, col)?].tile())
    }

    /// Stores a tile's sprite and kind. The region is owned by the geometry
    /// pass and is left untouched.
    ///
    /// Event and collision tiles never carry a sprite, so theirs is dropped.
    /// A ranged tile whose sprite lies outside its window stores `start`.
    pub fn set_tile(&mut self, layer: u32, row: u32, col: u32, tile: Tile) -> Result<(), MapError> {
        let i = self.offset(layer, row, col)?;
        let sprite = match tile.kind {
            TileKind::StaticSprite => tile.sprite_id,
            TileKind::RangedSprite { start, .. } => match (tile.sprite_id, tile.range()) {
                (Some(s), Some(window)) if window.contains(&s.0) => Some(s),
                _ => Some(start),
            },
            TileKind::Event | TileKind::Collision => None,
        };
        let raw = sprite_to_raw(sprite)?;
        let cell = &mut self.cells[i];
        cell.raw = raw;
        cell.kind = tile.kind;
        Ok(())
    }

    /// Puts a static sprite into a cell.
    pub fn place_sprite(
        &mut self,
        layer: u32,
        row: u32,
        col: u32,
        sprite: SpriteId,
    ) -> Result<(), MapError> {
        self.set_tile(layer, row, col, Tile::sprite(sprite))
    }

    /// Empties a cell.
    pub fn clear(&mut self, layer: u32, row: u32, col: u32) -> Result<(), MapError> {
        self.set_tile(layer, row, col, Tile::default())
    }

    /// Raw values of one row, left to right.
    pub fn raw_row(&self, layer: u32, row: u32) -> Result<impl Iterator<Item = u32> + '_, MapError> {
        let start = self.offset(layer, row, 0)?;
        Ok(self.cells[start..start + self.cols as usize]
            .iter()
            .map(|c| c.raw))
    }

    pub(crate) fn raw_row_mut(&mut self, layer: u32, row: u32) -> Result<&mut [Cell], MapError> {
        let start = self.offset(layer, row, 0)?;
        let cols = self.cols as usize;
        Ok(&mut self.cells[start..start + cols])
    }

    /// Sets every tile region from its own row and column, in every layer.
    pub fn init_tile_geometry(&mut self, diag: Diagnostics) -> Result<(), MapError> {
        diag.step(format_args!(
            "initializing tile position and dimensions for '{}'",
            self.name
        ));

        if self.cols == 0 || self.rows == 0 || self.layer_count == 0 {
            return Err(MapError::OutOfRange(format!(
                "map '{}' has an empty grid",
                self.name
            )));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(MapError::OutOfRange(format!(
                "map '{}' has zero tile size",
                self.name
            )));
        }
        if self.cells.len() != self.tile_count() {
            return Err(MapError::OutOfRange(format!(
                "map '{}' grid holds {} cells, expected {}",
                self.name,
                self.cells.len(),
                self.tile_count()
            )));
        }

        for layer in 0..self.layer_count {
            for row in 0..self.rows {
                for col in 0..self.cols {
                    let i = self.offset(layer, row, col)?;
                    self.cells[i].region = Region::new(
                        col * self.tile_width,
                        row * self.tile_height,
                        self.tile_width,
                        self.tile_height,
                    );
                }
            }
        }
        Ok(())
    }

    /// `(row, col)` under the screen pixel `(x, y)`.
    pub fn pick(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let (col, row) = (x as u32 / self.tile_width, y as u32 / self.tile_height);
        (col < self.cols && row < self.rows).then_some((row, col))
    }

    /// Draw commands for every visible tile, bottom layer first, rows then
    /// columns. Ranged tiles show the frame for `tick`.
    pub fn draw_commands(
        &self,
        catalog: &SpriteCatalog,
        tick: u64,
    ) -> Result<Vec<DrawCommand>, MapError> {
        let mut out = Vec::new();
        for cell in &self.cells {
            if let Some(sprite) = cell.tile().frame(tick) {
                out.push(catalog.draw_sprite_into(sprite, cell.region, false)?);
            }
        }
        Ok(out)
    }

    /// Sends [`Map::draw_commands`] to a backend.
    pub fn draw_map<R>(&self, catalog: &SpriteCatalog, backend: &mut R, tick: u64) -> Result<(), MapError>
    where
        R: RenderBackend + ?Sized,
    {
        for cmd in self.draw_commands(catalog, tick)? {
            backend.draw(&cmd)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), MapError> {
    if name.is_empty() {
        return Err(MapError::InvalidMap("map name is empty".into()));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(MapError::InvalidMap(format!(
            "map name '{name}' is not a plain file name"
        )));
    }
    Ok(())
}
