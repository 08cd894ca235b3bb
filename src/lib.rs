//! Reassembles a picture from square tiles that were shuffled, rotated and
//! flipped, then searches it for a fixed pattern.

pub mod assembler;
pub mod config;
pub mod edge_index;
pub mod error;
pub mod parse;
pub mod pattern;
pub mod render;
pub mod scramble;
pub mod solve;
pub mod tile;

#[cfg(test)]
mod fixtures;

pub use assembler::{combine, Arrangement, Assembler, AssemblyState};
pub use config::{Config, InputKind};
pub use edge_index::EdgeIndex;
pub use error::{Inconsistency, JigsawError, Result};
pub use parse::parse_tiles;
pub use pattern::{Pattern, PatternScanner};
pub use solve::{solve, Solution};
pub use tile::{Pixel, Pixels, Side, Tile, TileId};
