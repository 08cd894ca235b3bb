use std::collections::{BTreeSet, HashMap};

use crate::{
    error::{Inconsistency, Result},
    tile::{Tile, TileId},
};

/// Maps every edge signature to the tiles that can show it.
///
/// A signature held by one tile is a border of the picture, one held by two
/// tiles is a seam between them. The index is keyed on the orientation the
/// tiles had when it was built; rotating a tile afterwards does not change
/// the set of signatures it owns, only which side shows them, so lookups stay
/// valid as long as callers query by signature and compare sides on the tile
/// itself.
#[derive(Debug, Default, Clone)]
pub struct EdgeIndex {
    map: HashMap<String, BTreeSet<TileId>>,
}

impl EdgeIndex {
    pub fn build(tiles: &[Tile]) -> Self {
        let mut index = Self::default();
        for tile in tiles {
            for signature in tile.edge_signatures() {
                index.insert(signature, tile.id);
            }
        }
        log::debug!("edge index holds {} signatures for {} tiles", index.len(), tiles.len());
        return index;
    }

    fn insert(&mut self, signature: String, id: TileId) {
        log::trace!("edge {signature} -> tile {id}");
        self.map.entry(signature).or_insert_with(Default::default).insert(id);
    }

    pub fn len(&self) -> usize {
        return self.map.len();
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tiles_with(&self, signature: &str) -> Option<&BTreeSet<TileId>> {
        return self.map.get(signature);
    }

    /// True when exactly one tile has this edge
    pub fn is_border(&self, signature: &str) -> bool {
        return self.tiles_with(signature).map_or(false, |ids| ids.len() == 1);
    }

    /// Tiles with exactly four unique signatures, i.e. two border sides each
    /// read both ways, sorted by id.
    ///
    /// Assumes no edge is a palindrome: a palindromic border contributes one
    /// signature instead of two and its tile is miscounted.
    pub fn corners_of<'t>(&self, tiles: impl IntoIterator<Item = &'t Tile>) -> Vec<TileId> {
        let mut corners: Vec<TileId> = tiles
            .into_iter()
            .filter(|tile| {
                let unique = tile
                    .edge_signatures()
                    .iter()
                    .filter(|sig| self.is_border(sig))
                    .count();
                unique == 4
            })
            .map(|tile| tile.id)
            .collect();
        corners.sort_unstable();
        log::debug!("corner tiles: {corners:?}");
        return corners;
    }

    /// The tile other than `of` sharing `signature`.
    ///
    /// `None` means `signature` is a border. Two or more other tiles means the
    /// tile set cannot be assembled unambiguously.
    pub fn neighbour_across(&self, signature: &str, of: TileId) -> Result<Option<TileId>> {
        let Some(ids) = self.tiles_with(signature) else {
            return Ok(None);
        };
        let mut others = ids.iter().copied().filter(|&id| id != of);
        let first = others.next();
        if others.next().is_some() {
            return Err(Inconsistency::AmbiguousEdge {
                signature: signature.to_string(),
                tiles: ids.iter().copied().collect(),
            }
            .into());
        }
        return Ok(first);
    }

    /// Fails on the first signature shared by more than two tiles
    pub fn validate(&self) -> Result<()> {
        let mut crowded: Vec<(&String, &BTreeSet<TileId>)> =
            self.map.iter().filter(|(_, ids)| ids.len() > 2).collect();
        crowded.sort();
        if let Some((signature, ids)) = crowded.first() {
            return Err(Inconsistency::AmbiguousEdge {
                signature: signature.to_string(),
                tiles: ids.iter().copied().collect(),
            }
            .into());
        }
        return Ok(());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::JigsawError, fixtures::SMALL, parse::parse_tiles};

    #[test]
    fn every_tile_of_a_two_by_two_is_a_corner() {
        let tiles = parse_tiles(SMALL).unwrap();
        let index = EdgeIndex::build(&tiles);
        assert!(index.validate().is_ok());
        assert_eq!(index.corners_of(&tiles), vec![3212, 3429, 5382, 9919]);
    }

    #[test]
    fn seams_are_shared_by_two_tiles() {
        let tiles = parse_tiles(SMALL).unwrap();
        let index = EdgeIndex::build(&tiles);
        let shared = index.map.values().filter(|ids| ids.len() == 2).count();
        let borders = index.map.values().filter(|ids| ids.len() == 1).count();
        // 4 seams and 8 borders, each read both ways
        assert_eq!(shared, 8);
        assert_eq!(borders, 16);
    }

    #[test]
    fn neighbour_across_excludes_self() {
        let tiles = parse_tiles(SMALL).unwrap();
        let index = EdgeIndex::build(&tiles);
        let tile = &tiles[0];
        let mut neighbours = BTreeSet::new();
        for sig in tile.edge_signatures() {
            if let Some(other) = index.neighbour_across(&sig, tile.id).unwrap() {
                assert_ne!(other, tile.id);
                neighbours.insert(other);
            } else {
                assert!(index.is_border(&sig));
            }
        }
        assert_eq!(neighbours.len(), 2);
        assert_eq!(index.neighbour_across("no such edge", tile.id).unwrap(), None);
    }

    #[test]
    fn three_way_edge_is_fatal() {
        let input = "Tile 1:\n##.\n...\n...\n\nTile 2:\n##.\n.#.\n...\n\nTile 3:\n##.\n..#\n...\n";
        let tiles = parse_tiles(input).unwrap();
        let index = EdgeIndex::build(&tiles);
        let err = index.neighbour_across("##.", 1).unwrap_err();
        match err {
            JigsawError::InconsistentTileSet(Inconsistency::AmbiguousEdge { signature, tiles }) => {
                assert_eq!(signature, "##.");
                assert_eq!(tiles, vec![1, 2, 3]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(index.validate().is_err());
    }
}
