use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors produced while slicing atlases, loading sprites or reading and
/// writing maps.
#[derive(Debug)]
pub enum MapError {
    /// A cell or tile size of zero was supplied.
    InvalidGeometry {
        /// What the size describes ("atlas cell", "map tile", ...).
        what: &'static str,
        /// Offending width.
        width: u32,
        /// Offending height.
        height: u32,
    },
    /// An atlas image could not be read or decoded.
    AssetLoad {
        /// Image path.
        path: PathBuf,
        /// Decoder or collaborator message.
        reason: String,
    },
    /// Map construction arguments that cannot describe a grid.
    InvalidMap(String),
    /// The sprite manifest has no usable atlas lines.
    EmptyManifest(PathBuf),
    /// The metadata line of a map could not be parsed.
    CorruptMetadata {
        /// Metadata file.
        path: PathBuf,
        /// What is wrong with the line.
        reason: String,
    },
    /// A layer file holds a cell that is not a decimal integer.
    CorruptLayer {
        /// Layer file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Raw cell text.
        cell: String,
    },
    /// A layer file disagrees with the grid shape declared in the metadata.
    DimensionMismatch {
        /// Layer file.
        path: PathBuf,
        /// Declared `(rows, cols)`.
        expected: (u32, u32),
        /// `(rows, cols)` read: the file's row count and the column count of
        /// the first row that disagrees, or the declared cols if all agree.
        found: (u32, u32),
    },
    /// Filesystem failure.
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The editor config is not valid JSON for [`crate::EditorConfig`].
    Config {
        /// Config file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// Index outside the grid, unknown sprite, or a grid that was never
    /// allocated.
    OutOfRange(String),
}

impl MapError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MapError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidGeometry {
                what,
                width,
                height,
            } => write!(f, "Invalid {what} size {width}x{height}: both sides must be positive"),
            MapError::AssetLoad { path, reason } => {
                write!(f, "Failed to load asset {}: {reason}", path.display())
            }
            MapError::InvalidMap(msg) => write!(f, "Invalid map: {msg}"),
            MapError::EmptyManifest(path) => {
                write!(f, "Sprite manifest {} lists no atlases", path.display())
            }
            MapError::CorruptMetadata { path, reason } => {
                write!(f, "Corrupt map metadata in {}: {reason}", path.display())
            }
            MapError::CorruptLayer { path, line, cell } => write!(
                f,
                "Corrupt layer file {} at line {line}: '{cell}' is not a tile value",
                path.display()
            ),
            MapError::DimensionMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "Layer file {} does not match map shape: expected {} rows x {} cols, found {} x {}",
                path.display(),
                expected.0,
                expected.1,
                found.0,
                found.1
            ),
            MapError::Io { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
            MapError::Config { path, source } => {
                write!(f, "Invalid editor config {}: {source}", path.display())
            }
            MapError::OutOfRange(what) => write!(f, "Out of range: {what}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Config { source, .. } => Some(source),
            _ => None,
        }
    }
}
