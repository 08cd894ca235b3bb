use crate::{
    assembler::{combine, Assembler},
    edge_index::EdgeIndex,
    error::{Inconsistency, JigsawError, Result},
    pattern::PatternScanner,
    tile::{Pixels, Tile, TileId},
};

#[derive(Debug, Clone)]
pub struct Solution {
    pub corner_ids: Vec<TileId>,
    pub corner_product: u64,
    /// The assembled picture, turned so the pattern reads upright
    pub composite: Pixels,
    pub matches: usize,
    pub roughness: usize,
}

/// Product of the four corner ids
pub fn corner_product(tiles: &[Tile], index: &EdgeIndex) -> Result<u64> {
    let corners = index.corners_of(tiles);
    if corners.len() != 4 {
        return Err(Inconsistency::CornerCount { found: corners }.into());
    }
    let product = corners.iter().try_fold(1u64, |acc, &id| acc.checked_mul(id));
    return product.ok_or(JigsawError::CornerProductOverflow { corners });
}

/// Runs the whole pipeline: index, corners, assembly, orientation, roughness.
pub fn solve(tiles: Vec<Tile>) -> Result<Solution> {
    solve_with(tiles, &PatternScanner::default())
}

pub fn solve_with(tiles: Vec<Tile>, scanner: &PatternScanner) -> Result<Solution> {
    let index = EdgeIndex::build(&tiles);
    index.validate()?;
    let corner_ids = index.corners_of(&tiles);
    let corner_product = corner_product(&tiles, &index)?;
    log::info!("corner product {corner_product} from {corner_ids:?}");

    let arrangement = Assembler::new(tiles, &index).assemble()?;
    let composite = combine(&arrangement)?;
    log::info!("composite is {}x{}", composite.width(), composite.height());

    let (composite, matches) = scanner.orient_until_found(composite)?;
    let roughness = scanner.roughness(&composite);
    log::info!("roughness {roughness} after {matches} matches");

    return Ok(Solution {
        corner_ids,
        corner_product,
        composite,
        matches,
        roughness,
    });
}
