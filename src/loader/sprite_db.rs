use crate::atlas::Atlas;
use crate::catalog::SpriteCatalog;
use crate::config::EditorConfig;
use crate::error::MapError;
use crate::render::{ImageSource, RenderBackend};
use crate::Diagnostics;
use std::path::{Path, PathBuf};

/// Builds a [`SpriteCatalog`] from a manifest listing one atlas image per
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteDatabaseLoader {
    /// Atlas cell width in pixels.
    pub cell_width: u32,
    /// Atlas cell height in pixels.
    pub cell_height: u32,
    /// At most this many sprites are taken from each atlas.
    pub sprites_per_atlas: usize,
    /// RGB made transparent before upload.
    pub color_key: Option<[u8; 3]>,
}

impl Default for SpriteDatabaseLoader {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl SpriteDatabaseLoader {
    /// Loader using the config's cell size, cap and color key.
    pub fn from_config(cfg: &EditorConfig) -> Self {
        SpriteDatabaseLoader {
            cell_width: cfg.cell_width,
            cell_height: cfg.cell_height,
            sprites_per_atlas: cfg.sprites_per_atlas,
            color_key: cfg.color_key,
        }
    }

    /// Loads every atlas named in `manifest_path`, uploads it through
    /// `renderer` and returns the catalog together with its sprite count.
    ///
    /// Relative atlas paths are resolved against the manifest's directory.
    pub fn load<I, R>(
        &self,
        manifest_path: impl AsRef<Path>,
        images: &mut I,
        renderer: &mut R,
        diag: Diagnostics,
    ) -> Result<(SpriteCatalog, usize), MapError>
    where
        I: ImageSource + ?Sized,
        R: RenderBackend + ?Sized,
    {
        let manifest_path = manifest_path.as_ref();
        diag.step(format_args!(
            "loading sprite database {}",
            manifest_path.display()
        ));

        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(MapError::InvalidGeometry {
                what: "atlas cell",
                width: self.cell_width,
                height: self.cell_height,
            });
        }

        let txt = std::fs::read_to_string(manifest_path)
            .map_err(|source| MapError::io(manifest_path, source))?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        let atlas_paths = parse_manifest(&txt, base);
        if atlas_paths.is_empty() {
            return Err(MapError::EmptyManifest(manifest_path.to_path_buf()));
        }

        let mut catalog = SpriteCatalog::new();
        for path in atlas_paths {
            diag.step(format_args!("loading atlas {}", path.display()));

            let mut image = images.load_image(&path)?;
            if let Some(key) = self.color_key {
                image.apply_color_key(key);
            }
            let texture = renderer.upload_texture(&image)?;
            let atlas = Atlas::new(
                path.clone(),
                image.width,
                image.height,
                self.cell_width,
                self.cell_height,
                texture,
            )?;

            let produced = atlas.cell_regions().len();
            if produced < self.sprites_per_atlas {
                diag.warn(format_args!(
                    "atlas {} has {produced} cells, expected {}",
                    path.display(),
                    self.sprites_per_atlas
                ));
            }

            let added = catalog.push_atlas(atlas, self.sprites_per_atlas);
            diag.step(format_args!("{added} sprites from {}", path.display()));
        }

        let count = catalog.count();
        diag.step(format_args!("{count} sprites loaded"));
        Ok((catalog, count))
    }
}

/// Atlas paths of a manifest, skipping blank lines.
pub fn parse_manifest(txt: &str, base_dir: &Path) -> Vec<PathBuf> {
    txt.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| base_dir.join(line))
        .collect()
}
