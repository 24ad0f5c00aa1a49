use crate::error::MapError;
use crate::Diagnostics;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Editor settings read from a JSON file. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorConfig {
    /// Directory that holds one sub-directory per saved map.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    /// Sprite manifest, one atlas image path per line.
    #[serde(default = "default_sprite_db")]
    pub sprite_db: PathBuf,
    /// Width of one atlas cell in pixels.
    #[serde(default = "sixteen")]
    pub cell_width: u32,
    /// Height of one atlas cell in pixels.
    #[serde(default = "sixteen")]
    pub cell_height: u32,
    /// Upper bound of sprites taken from a single atlas.
    #[serde(default = "default_sprites_per_atlas")]
    pub sprites_per_atlas: usize,
    /// RGB value made fully transparent when atlases are loaded.
    #[serde(default = "default_color_key")]
    pub color_key: Option<[u8; 3]>,
    /// Log progress steps at `info` instead of `debug`.
    #[serde(default)]
    pub verbose: bool,
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("asset")
}
fn default_sprite_db() -> PathBuf {
    PathBuf::from("sprite.db")
}
fn sixteen() -> u32 {
    16
}
fn default_sprites_per_atlas() -> usize {
    25
}
fn default_color_key() -> Option<[u8; 3]> {
    Some([0x00, 0xFF, 0xFF])
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            asset_root: default_asset_root(),
            sprite_db: default_sprite_db(),
            cell_width: sixteen(),
            cell_height: sixteen(),
            sprites_per_atlas: default_sprites_per_atlas(),
            color_key: default_color_key(),
            verbose: false,
        }
    }
}

impl EditorConfig {
    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| MapError::io(p, source))?;
        Self::from_json(&txt).map_err(|source| MapError::Config {
            path: p.to_path_buf(),
            source,
        })
    }

    /// Parses config JSON held in memory.
    pub fn from_json(txt: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(txt)
    }

    /// Diagnostics matching the `verbose` flag.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new(self.verbose)
    }
}
