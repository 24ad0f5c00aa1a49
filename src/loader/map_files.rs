// On-disk layout of a saved map named `NAME` under the asset root:
//
//   <asset_root>/NAME/NAME.md     cols,rows,layers,sprite_w,sprite_h,<storage dir>
//   <asset_root>/NAME/NAME_<i>.lr one line per row, every value followed by ','
use crate::error::MapError;
use crate::map::Map;
use crate::Diagnostics;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Header of a `.md` metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHeader {
    /// Columns per row.
    pub cols: u32,
    /// Rows per layer.
    pub rows: u32,
    /// Number of layer files.
    pub layer_count: u32,
    /// Sprite width in pixels.
    pub sprite_width: u32,
    /// Sprite height in pixels.
    pub sprite_height: u32,
    /// Storage directory recorded when the map was saved.
    pub storage: String,
}

/// Saves maps below an asset root, one directory per map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStore {
    asset_root: PathBuf,
}

impl MapStore {
    /// Store rooted at `asset_root`.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        MapStore {
            asset_root: asset_root.into(),
        }
    }

    /// Directory holding the map directories.
    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// `<asset_root>/<name>`.
    pub fn storage_dir(&self, name: &str) -> PathBuf {
        self.asset_root.join(name)
    }

    /// Writes the metadata file and one layer file per layer, then records
    /// the storage directory on `map`.
    ///
    /// Each file is written to a temporary name and renamed into place;
    /// layers go first and metadata last. A failure part way leaves the
    /// directory in a state a later `save` overwrites.
    pub fn save(&self, map: &mut Map, diag: Diagnostics) -> Result<PathBuf, MapError> {
        let dir = self.storage_dir(map.name());
        diag.step(format_args!("saving map '{}' to {}", map.name(), dir.display()));

        fs::create_dir_all(&dir).map_err(|source| MapError::io(&dir, source))?;

        for layer in 0..map.layer_count() {
            let path = dir.join(layer_file_name(map.name(), layer));
            diag.step(format_args!("writing {}", path.display()));
            write_replacing(&path, encode_layer(map, layer)?.as_bytes())?;
        }
        remove_stale_layers(&dir, map.name(), map.layer_count())?;

        let md = dir.join(metadata_file_name(map.name()));
        write_replacing(&md, encode_metadata(map, &dir).as_bytes())?;

        map.set_storage_path(dir.clone());
        Ok(dir)
    }

    /// Loads the map called `name` from this store.
    pub fn load(&self, name: &str, diag: Diagnostics) -> Result<Map, MapError> {
        load_map(self.storage_dir(name), diag)
    }
}

/// `NAME.md`
pub fn metadata_file_name(name: &str) -> String {
    format!("{name}.md")
}

/// `NAME_<layer>.lr`
pub fn layer_file_name(name: &str, layer: u32) -> String {
    format!("{name}_{layer}.lr")
}

/// Metadata line: the five header integers, each followed by a comma, then
/// the storage directory with a trailing `/`.
pub fn encode_metadata(map: &Map, storage: &Path) -> String {
    let mut dir = storage.to_string_lossy().into_owned();
    if !dir.ends_with('/') {
        dir.push('/');
    }
    format!(
        "{},{},{},{},{},{dir}\n",
        map.cols(),
        map.rows(),
        map.layer_count(),
        map.sprite_width(),
        map.sprite_height()
    )
}

/// One layer as text: `rows` lines of `cols` comma-terminated values.
pub fn encode_layer(map: &Map, layer: u32) -> Result<String, MapError> {
    let mut out = String::with_capacity(map.rows() as usize * (map.cols() as usize * 2 + 1));
    for row in 0..map.rows() {
        for raw in map.raw_row(layer, row)? {
            out.push_str(&raw.to_string());
            out.push(',');
        }
        out.push('\n');
    }
    Ok(out)
}

/// Parses the first line of a metadata file.
///
/// Only the comma form written by [`encode_metadata`] is accepted. A legacy
/// `WIDTHxHEIGHT` line is recognised so it can be reported precisely, but it
/// lacks layer and sprite sizes and is rejected.
pub fn parse_metadata(txt: &str, path: &Path) -> Result<MapHeader, MapError> {
    let corrupt = |reason: String| MapError::CorruptMetadata {
        path: path.to_path_buf(),
        reason,
    };

    let line = first_line(txt);
    if !line.contains(',') {
        let (w, h) = parse_legacy_dimensions(line, path)?;
        return Err(corrupt(format!(
            "legacy dimension header {w}x{h} carries no layer or sprite sizes; re-save the map"
        )));
    }

    let mut fields = line.splitn(6, ',');
    let mut next = |what: &str| -> Result<u32, MapError> {
        let tok = fields
            .next()
            .ok_or_else(|| corrupt(format!("missing {what}")))?
            .trim();
        match tok.parse::<u32>() {
            Ok(0) => Err(corrupt(format!("{what} is zero"))),
            Ok(n) => Ok(n),
            Err(_) => Err(corrupt(format!("{what} '{tok}' is not a positive integer"))),
        }
    };

    let cols = next("column count")?;
    let rows = next("row count")?;
    let layer_count = next("layer count")?;
    let sprite_width = next("sprite width")?;
    let sprite_height = next("sprite height")?;
    let storage = fields.next().unwrap_or("").trim().to_owned();

    Ok(MapHeader {
        cols,
        rows,
        layer_count,
        sprite_width,
        sprite_height,
        storage,
    })
}

/// Splits a legacy `WIDTHxHEIGHT` line at its first `x`.
pub fn parse_legacy_dimensions(line: &str, path: &Path) -> Result<(u32, u32), MapError> {
    let corrupt = |reason: String| MapError::CorruptMetadata {
        path: path.to_path_buf(),
        reason,
    };

    let line = first_line(line);
    let (w, h) = line
        .split_once('x')
        .ok_or_else(|| corrupt(format!("no 'x' in dimension line '{line}'")))?;
    let parse = |tok: &str, what: &str| {
        tok.trim()
            .parse::<u32>()
            .map_err(|_| corrupt(format!("{what} '{tok}' is not a non-negative integer")))
    };
    Ok((parse(w, "width")?, parse(h, "height")?))
}

/// Parses one layer file into `rows` rows of `cols` values.
pub fn decode_layer(txt: &str, path: &Path, rows: u32, cols: u32) -> Result<Vec<Vec<u32>>, MapError> {
    let mismatch = |found: (u32, u32)| MapError::DimensionMismatch {
        path: path.to_path_buf(),
        expected: (rows, cols),
        found,
    };

    let mut lines: Vec<&str> = txt.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let mut out = Vec::with_capacity(rows as usize);
    for (n, line) in lines.iter().enumerate() {
        let mut cells: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
        if cells.last().is_some_and(|c| c.trim().is_empty()) {
            cells.pop();
        }

        let values = cells
            .iter()
            .map(|cell| {
                cell.trim().parse::<u32>().map_err(|_| MapError::CorruptLayer {
                    path: path.to_path_buf(),
                    line: n + 1,
                    cell: (*cell).to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != cols as usize {
            return Err(mismatch((lines.len() as u32, values.len() as u32)));
        }
        out.push(values);
    }

    if out.len() != rows as usize {
        return Err(mismatch((out.len() as u32, cols)));
    }
    Ok(out)
}

/// Loads a saved map from its storage directory, or from the path of its
/// `.md` file.
///
/// Tile regions are left for [`Map::init_tile_geometry`].
pub fn load_map(path: impl AsRef<Path>, diag: Diagnostics) -> Result<Map, MapError> {
    let path = path.as_ref();
    let (dir, md) = if path.extension().is_some_and(|e| e == "md") {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        (dir, path.to_path_buf())
    } else {
        let name = path
            .file_name()
            .ok_or_else(|| MapError::InvalidMap(format!("{} names no map", path.display())))?
            .to_string_lossy()
            .into_owned();
        (path.to_path_buf(), path.join(metadata_file_name(&name)))
    };
    let name = md
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    diag.step(format_args!("loading map metadata {}", md.display()));
    let txt = fs::read_to_string(&md).map_err(|source| MapError::io(&md, source))?;
    let header = parse_metadata(&txt, &md)?;
    if Path::new(&header.storage) != dir.as_path() {
        log::debug!(
            "map '{name}' was saved to {}, loading from {}",
            header.storage,
            dir.display()
        );
    }

    let mut map = Map::create(
        header.cols,
        header.rows,
        header.layer_count,
        header.sprite_width,
        header.sprite_height,
        &name,
        diag,
    )?;

    for layer in 0..header.layer_count {
        let lr = dir.join(layer_file_name(&name, layer));
        diag.step(format_args!("reading {}", lr.display()));
        let txt = fs::read_to_string(&lr).map_err(|source| MapError::io(&lr, source))?;
        let grid = decode_layer(&txt, &lr, header.rows, header.cols)?;
        for (row, values) in grid.into_iter().enumerate() {
            for (cell, raw) in map.raw_row_mut(layer, row as u32)?.iter_mut().zip(values) {
                cell.raw = raw;
            }
        }
    }

    map.set_storage_path(dir);
    Ok(map)
}

fn first_line(txt: &str) -> &str {
    txt.lines().next().unwrap_or("").trim_end_matches('\r')
}

fn write_replacing(path: &Path, contents: &[u8]) -> Result<(), MapError> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(|source| MapError::io(&tmp, source))?;
    fs::rename(&tmp, path).map_err(|source| MapError::io(path, source))
}

// Layer files above the current layer count belong to an earlier save.
fn remove_stale_layers(dir: &Path, name: &str, layer_count: u32) -> Result<(), MapError> {
    let mut layer = layer_count;
    loop {
        let path = dir.join(layer_file_name(name, layer));
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|source| MapError::io(&path, source))?;
        layer += 1;
    }
}
