use std::path::PathBuf;

use crate::tile::{Side, TileId};

pub type Result<T> = std::result::Result<T, JigsawError>;

#[derive(Debug, thiserror::Error)]
pub enum JigsawError {
    /// The tile text could not be read. `line` is 1-based.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("inconsistent tile set: {0}")]
    InconsistentTileSet(#[from] Inconsistency),

    #[error("could not generate a puzzle with unique edges after {attempts} attempts")]
    GeneratorExhausted { attempts: usize },

    #[error("product of corner ids {corners:?} overflows")]
    CornerProductOverflow { corners: Vec<TileId> },

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },

    #[error("failed to write {path:?}: {source}")]
    Render {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl JigsawError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        return JigsawError::MalformedInput {
            line,
            reason: reason.into(),
        };
    }
}

/// Ways a parsed tile set can fail to form a single picture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
    #[error("edge {signature} is shared by tiles {tiles:?}")]
    AmbiguousEdge {
        signature: String,
        tiles: Vec<TileId>,
    },

    #[error("no corner tiles found")]
    NoCorners,

    #[error("expected 4 corner tiles, found {found:?}")]
    CornerCount { found: Vec<TileId> },

    #[error("corner tile {tile} has no rotation with borders on top and left")]
    NoSeedOrientation { tile: TileId },

    #[error("tile {tile} has no orientation putting {edge} on its {side:?} side")]
    NoOrientation {
        tile: TileId,
        side: Side,
        edge: String,
    },

    #[error("no tile below {tile} although {remaining} tiles are unplaced")]
    MissingNeighbour { tile: TileId, remaining: usize },

    #[error("tile {tile} would be placed twice")]
    TileReused { tile: TileId },

    #[error("edge {signature} references unknown tile {tile}")]
    UnknownTile { tile: TileId, signature: String },

    #[error("row {row} holds {found} tiles, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("assembled image is {width}x{height}, expected a square")]
    NonSquareImage { width: usize, height: usize },

    #[error("pattern not found in any of the 8 orientations")]
    PatternNotFound,
}
