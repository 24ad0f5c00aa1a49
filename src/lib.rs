#![warn(missing_docs)]

//! Layered tile-map model for a Macroquad map editor: sprite atlases cut into
//! a global sprite catalog, a `[layer][row][col]` tile grid, and the
//! `.md`/`.lr` files maps are saved as.

mod atlas;
mod catalog;
mod command;
mod config;
mod diagnostics;
mod error;
mod geom;
mod loader {
    pub mod map_files;
    pub mod sprite_db;
}
mod map;
pub mod render;

pub use atlas::{slice, Atlas};
pub use catalog::{AtlasId, Sprite, SpriteCatalog, SpriteId};
pub use command::DrawCommand;
pub use config::EditorConfig;
pub use diagnostics::Diagnostics;
pub use error::MapError;
pub use geom::Region;
pub use loader::map_files::{
    decode_layer, encode_layer, encode_metadata, layer_file_name, load_map, metadata_file_name,
    parse_legacy_dimensions, parse_metadata, MapHeader, MapStore,
};
pub use loader::sprite_db::{parse_manifest, SpriteDatabaseLoader};
pub use map::{raw_to_sprite, sprite_to_raw, Map, MapMetadata, Tile, TileKind};
