use derive_more::{Deref, From, IsVariant};
use glam::UVec2;
use std::collections::BTreeMap;

use crate::{
    edge_index::EdgeIndex,
    error::{Inconsistency, Result},
    tile::{Pixels, Side, Tile, TileId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum AssemblyState {
    /// Pick a corner and turn it into the top left position
    SeedSelection,
    /// Extend the current row to the right
    RowWalk,
    /// Start a new row below the first tile of the last one
    RowAdvance,
    Done,
}

/// Placed tiles, row by row, each turned to fit its neighbours
#[derive(Deref, From, Clone, Debug, Default, PartialEq, Eq)]
pub struct Arrangement(Vec<Vec<Tile>>);

impl Arrangement {
    /// Columns of the first row by number of rows
    pub fn dims(&self) -> UVec2 {
        let cols = self.0.first().map_or(0, Vec::len);
        return UVec2::new(cols as u32, self.0.len() as u32);
    }

    pub fn ids(&self) -> Vec<Vec<TileId>> {
        return self
            .0
            .iter()
            .map(|row| row.iter().map(|tile| tile.id).collect())
            .collect();
    }

    pub fn tile_count(&self) -> usize {
        return self.0.iter().map(Vec::len).sum();
    }

    /// Ids at the four corners of the grid, sorted
    pub fn corner_ids(&self) -> Vec<TileId> {
        let (Some(first), Some(last)) = (self.0.first(), self.0.last()) else {
            return Vec::new();
        };
        let mut ids: Vec<TileId> = [first.first(), first.last(), last.first(), last.last()]
            .into_iter()
            .flatten()
            .map(|tile| tile.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        return ids;
    }

    /// True when every tile agrees with its left and upper neighbour
    pub fn check_seams(&self) -> bool {
        for (r, row) in self.0.iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                if c > 0 && row[c - 1].edge(Side::Right) != tile.edge(Side::Left) {
                    return false;
                }
                if r > 0 {
                    let above = self.0[r - 1].get(c).map(|t| t.edge(Side::Bottom));
                    if above.as_deref() != Some(tile.edge(Side::Top).as_str()) {
                        return false;
                    }
                }
            }
        }
        return true;
    }
}

/// Flips and rotates `tile` until `side` reads `edge`.
///
/// Tries the 8 orientations in the usual order. On failure the tile is back
/// in the orientation it came in with.
pub fn orient_to_match(tile: &mut Tile, side: Side, edge: &str) -> Result<()> {
    for _flip in 0..2 {
        for _rotation in 0..4 {
            if tile.edge(side) == edge {
                return Ok(());
            }
            tile.rotate();
        }
        tile.flip();
    }
    return Err(Inconsistency::NoOrientation {
        tile: tile.id,
        side,
        edge: edge.to_string(),
    }
    .into());
}

/// Grows the picture from a corner, one tile at a time.
///
/// Only edges of tiles that are already placed are looked up in the index.
/// A candidate is then checked against its own freshly read sides, so turning
/// it never leaves a stale answer behind.
pub struct Assembler<'a> {
    index: &'a EdgeIndex,
    unplaced: BTreeMap<TileId, Tile>,
    total: usize,
    rows: Vec<Vec<Tile>>,
    state: AssemblyState,
}

impl<'a> Assembler<'a> {
    pub fn new(tiles: Vec<Tile>, index: &'a EdgeIndex) -> Self {
        let total = tiles.len();
        let unplaced = tiles.into_iter().map(|tile| (tile.id, tile)).collect();
        return Self {
            index,
            unplaced,
            total,
            rows: Vec::new(),
            state: AssemblyState::SeedSelection,
        };
    }

    pub fn state(&self) -> AssemblyState {
        return self.state;
    }

    pub fn placed(&self) -> usize {
        return self.total - self.unplaced.len();
    }

    pub fn assemble(mut self) -> Result<Arrangement> {
        while !self.state.is_done() {
            self.step()?;
        }
        let arrangement = Arrangement(self.rows);
        let dims = arrangement.dims();
        log::info!("assembled {} tiles into {}x{}", self.total, dims.x, dims.y);
        return Ok(arrangement);
    }

    /// Runs the current state once and returns the next one
    pub fn step(&mut self) -> Result<AssemblyState> {
        let next = match self.state {
            AssemblyState::SeedSelection => self.select_seed()?,
            AssemblyState::RowWalk => self.walk_row()?,
            AssemblyState::RowAdvance => self.advance_row()?,
            AssemblyState::Done => AssemblyState::Done,
        };
        if next != self.state {
            log::debug!("{:?} -> {:?} ({}/{} placed)", self.state, next, self.placed(), self.total);
        }
        self.state = next;
        return Ok(next);
    }

    fn after_placement(&self) -> AssemblyState {
        if self.unplaced.is_empty() {
            AssemblyState::Done
        } else {
            AssemblyState::RowWalk
        }
    }

    fn select_seed(&mut self) -> Result<AssemblyState> {
        let corners = self.index.corners_of(self.unplaced.values());
        let Some(&seed_id) = corners.first() else {
            return Err(Inconsistency::NoCorners.into());
        };
        let mut seed = self.take(seed_id, "")?;
        let mut oriented = false;
        for _rotation in 0..4 {
            if self.index.is_border(&seed.edge(Side::Top)) && self.index.is_border(&seed.edge(Side::Left)) {
                oriented = true;
                break;
            }
            seed.rotate();
        }
        if !oriented {
            return Err(Inconsistency::NoSeedOrientation { tile: seed_id }.into());
        }
        log::debug!("placed seed {seed_id} at (0, 0)");
        self.rows.push(vec![seed]);
        return Ok(self.after_placement());
    }

    fn walk_row(&mut self) -> Result<AssemblyState> {
        let (prev_id, edge) = match self.rows.last().and_then(|row| row.last()) {
            Some(prev) => (prev.id, prev.edge(Side::Right)),
            None => return Ok(AssemblyState::SeedSelection),
        };
        let Some(next_id) = self.index.neighbour_across(&edge, prev_id)? else {
            return Ok(AssemblyState::RowAdvance);
        };
        let mut tile = self.take(next_id, &edge)?;
        orient_to_match(&mut tile, Side::Left, &edge)?;
        let row = self.rows.len() - 1;
        let col = self.rows[row].len();
        log::debug!("placed tile {next_id} at ({row}, {col})");
        self.rows[row].push(tile);
        return Ok(self.after_placement());
    }

    fn advance_row(&mut self) -> Result<AssemblyState> {
        let (above_id, edge) = match self.rows.last().and_then(|row| row.first()) {
            Some(above) => (above.id, above.edge(Side::Bottom)),
            None => return Ok(AssemblyState::SeedSelection),
        };
        let Some(next_id) = self.index.neighbour_across(&edge, above_id)? else {
            return Err(Inconsistency::MissingNeighbour {
                tile: above_id,
                remaining: self.unplaced.len(),
            }
            .into());
        };
        let mut tile = self.take(next_id, &edge)?;
        orient_to_match(&mut tile, Side::Top, &edge)?;
        log::debug!("placed tile {next_id} at ({}, 0)", self.rows.len());
        self.rows.push(vec![tile]);
        return Ok(self.after_placement());
    }

    fn take(&mut self, id: TileId, signature: &str) -> Result<Tile> {
        if let Some(tile) = self.unplaced.remove(&id) {
            return Ok(tile);
        }
        let placed = self.rows.iter().flatten().any(|tile| tile.id == id);
        if placed {
            return Err(Inconsistency::TileReused { tile: id }.into());
        }
        return Err(Inconsistency::UnknownTile {
            tile: id,
            signature: signature.to_string(),
        }
        .into());
    }
}

/// Trims every tile's border and stitches the interiors row by row.
pub fn combine(arrangement: &Arrangement) -> Result<Pixels> {
    let expected = arrangement.first().map_or(0, Vec::len);
    for (row, tiles) in arrangement.iter().enumerate() {
        if tiles.len() != expected {
            return Err(Inconsistency::RaggedGrid {
                row,
                expected,
                found: tiles.len(),
            }
            .into());
        }
    }

    let mut rows = Vec::new();
    for tile_row in arrangement.iter() {
        let interiors: Vec<Pixels> = tile_row.iter().map(|tile| tile.pixels.interior()).collect();
        let height = interiors.first().map_or(0, Pixels::height);
        for r in 0..height {
            rows.push(interiors.iter().flat_map(|p| p[r].iter().copied()).collect());
        }
    }
    let image = Pixels(rows);
    if !image.is_square() {
        return Err(Inconsistency::NonSquareImage {
            width: image.width(),
            height: image.height(),
        }
        .into());
    }
    return Ok(image);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::JigsawError,
        fixtures::{SMALL, SMALL_COMPOSITE},
        parse::parse_tiles,
        scramble::scramble,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn assemble(tiles: Vec<Tile>) -> Result<Arrangement> {
        let index = EdgeIndex::build(&tiles);
        return Assembler::new(tiles, &index).assemble();
    }

    fn inconsistency(err: JigsawError) -> Inconsistency {
        match err {
            JigsawError::InconsistentTileSet(inner) => inner,
            other => panic!("expected an inconsistent tile set, got {other:?}"),
        }
    }

    #[test]
    fn two_by_two_reassembles_to_known_picture() {
        let arrangement = assemble(parse_tiles(SMALL).unwrap()).unwrap();
        assert_eq!(arrangement.ids(), vec![vec![3212, 9919], vec![3429, 5382]]);
        assert_eq!(arrangement.dims(), UVec2::new(2, 2));
        assert!(arrangement.check_seams());
        assert_eq!(arrangement.corner_ids(), vec![3212, 3429, 5382, 9919]);
        let composite = combine(&arrangement).unwrap();
        assert_eq!(composite.to_string(), SMALL_COMPOSITE);
    }

    #[test]
    fn seed_ends_up_with_borders_top_and_left() {
        let tiles = parse_tiles(SMALL).unwrap();
        let index = EdgeIndex::build(&tiles);
        let mut assembler = Assembler::new(tiles, &index);
        assert_eq!(assembler.step().unwrap(), AssemblyState::RowWalk);
        let seed = &assembler.rows[0][0];
        assert!(index.is_border(&seed.edge(Side::Top)));
        assert!(index.is_border(&seed.edge(Side::Left)));
        assert_eq!(assembler.placed(), 1);
    }

    #[test]
    fn walks_through_every_state() {
        let tiles = parse_tiles(SMALL).unwrap();
        let index = EdgeIndex::build(&tiles);
        let mut assembler = Assembler::new(tiles, &index);
        let mut states = vec![assembler.state()];
        while !assembler.state().is_done() {
            states.push(assembler.step().unwrap());
        }
        use AssemblyState::*;
        assert_eq!(states, vec![SeedSelection, RowWalk, RowWalk, RowAdvance, RowWalk, Done]);
    }

    #[test]
    fn scrambled_puzzles_reassemble() {
        let mut rng = StdRng::seed_from_u64(20);
        for grid in 2..=5u32 {
            let puzzle = scramble(grid as usize, 10, &mut rng).unwrap();
            let arrangement = assemble(puzzle.tiles.clone()).unwrap();
            assert_eq!(arrangement.dims(), UVec2::splat(grid));
            assert_eq!(arrangement.tile_count(), puzzle.tiles.len());
            assert!(arrangement.check_seams());
            assert_eq!(arrangement.corner_ids(), puzzle.corner_ids);
            let composite = combine(&arrangement).unwrap();
            assert!(puzzle.picture.orientations().contains(&composite));
        }
    }

    #[test]
    fn missing_tile_leaves_ragged_grid() {
        let tiles: Vec<Tile> = parse_tiles(SMALL)
            .unwrap()
            .into_iter()
            .filter(|tile| tile.id != 5382)
            .collect();
        let arrangement = assemble(tiles).unwrap();
        assert_eq!(arrangement.ids(), vec![vec![3212, 9919], vec![3429]]);
        let err = combine(&arrangement).unwrap_err();
        assert_eq!(
            inconsistency(err),
            Inconsistency::RaggedGrid { row: 1, expected: 2, found: 1 }
        );
    }

    #[test]
    fn unrelated_tile_is_never_reached() {
        let mut tiles = parse_tiles(SMALL).unwrap();
        tiles.push(Tile::new(1, "......\n".repeat(6).parse().unwrap()));
        let err = assemble(tiles).unwrap_err();
        assert_eq!(
            inconsistency(err),
            Inconsistency::MissingNeighbour { tile: 3429, remaining: 1 }
        );
    }

    #[test]
    fn single_tile_has_no_corners() {
        let tiles: Vec<Tile> = parse_tiles(SMALL).unwrap().into_iter().take(1).collect();
        assert_eq!(inconsistency(assemble(tiles).unwrap_err()), Inconsistency::NoCorners);
    }

    #[test]
    fn exhausted_orientation_search_is_fatal() {
        let mut tile = parse_tiles(SMALL).unwrap().remove(0);
        let before = tile.clone();
        let err = orient_to_match(&mut tile, Side::Left, "......").unwrap_err();
        assert!(matches!(inconsistency(err), Inconsistency::NoOrientation { tile: 9919, side: Side::Left, .. }));
        assert_eq!(tile, before);
    }

    #[test]
    fn orient_finds_reversed_edge() {
        let mut tile = parse_tiles(SMALL).unwrap().remove(0);
        let wanted: String = tile.edge(Side::Top).chars().rev().collect();
        orient_to_match(&mut tile, Side::Right, &wanted).unwrap();
        assert_eq!(tile.edge(Side::Right), wanted);
    }
}
