use std::collections::HashSet;

use crate::{
    error::{JigsawError, Result},
    tile::{Pixel, Pixels, Tile, TileId},
};

pub(crate) fn parse_pixel_row(line: &str, line_no: usize) -> Result<Vec<Pixel>> {
    return line
        .chars()
        .map(|c| {
            Pixel::from_char(c).ok_or_else(|| {
                JigsawError::malformed(line_no, format!("unexpected pixel {c:?}"))
            })
        })
        .collect();
}

fn parse_header(line: &str, line_no: usize) -> Result<TileId> {
    let id = line
        .strip_prefix("Tile")
        .and_then(|rest| rest.trim().strip_suffix(':'))
        .ok_or_else(|| JigsawError::malformed(line_no, format!("expected `Tile <id>:`, got {line:?}")))?;
    return id
        .trim()
        .parse()
        .map_err(|err| JigsawError::malformed(line_no, format!("bad tile id {id:?}: {err}")));
}

/// A tile being read, with the line its header was on
struct PendingTile {
    id: TileId,
    line_no: usize,
    rows: Vec<Vec<Pixel>>,
}

impl PendingTile {
    fn finish(self) -> Result<Tile> {
        let side = self.rows.len();
        if side == 0 {
            return Err(JigsawError::malformed(self.line_no, format!("tile {} has no pixels", self.id)));
        }
        if self.rows[0].len() != side {
            return Err(JigsawError::malformed(
                self.line_no,
                format!("tile {} is {}x{}, expected a square", self.id, self.rows[0].len(), side),
            ));
        }
        return Ok(Tile::new(self.id, Pixels(self.rows)));
    }
}

/// Reads blank-line separated `Tile <id>:` blocks of `#`/`.` rows.
pub fn parse_tiles(input: &str) -> Result<Vec<Tile>> {
    let mut tiles: Vec<Tile> = Vec::new();
    let mut pending: Option<PendingTile> = None;

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            if let Some(done) = pending.take() {
                tiles.push(done.finish()?);
            }
            continue;
        }
        match pending.as_mut() {
            None => {
                let id = parse_header(line, line_no)?;
                pending = Some(PendingTile { id, line_no, rows: Vec::new() });
            }
            Some(tile) => {
                let row = parse_pixel_row(line, line_no)?;
                if let Some(first) = tile.rows.first() {
                    if first.len() != row.len() {
                        return Err(JigsawError::malformed(
                            line_no,
                            format!("row has {} pixels, tile {} rows have {}", row.len(), tile.id, first.len()),
                        ));
                    }
                }
                tile.rows.push(row);
            }
        }
    }
    if let Some(done) = pending.take() {
        tiles.push(done.finish()?);
    }

    let Some(first) = tiles.first() else {
        return Err(JigsawError::malformed(1, "no tiles in input"));
    };
    let side = first.side_len();
    let mut seen: HashSet<TileId> = HashSet::with_capacity(tiles.len());
    for tile in &tiles {
        if tile.side_len() != side {
            return Err(JigsawError::malformed(
                1,
                format!("tile {} has side {}, other tiles have {}", tile.id, tile.side_len(), side),
            ));
        }
        if !seen.insert(tile.id) {
            return Err(JigsawError::malformed(1, format!("duplicate tile id {}", tile.id)));
        }
    }
    log::info!("parsed {} tiles of {side}x{side}", tiles.len());
    return Ok(tiles);
}
