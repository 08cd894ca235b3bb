//! Cuts a picture into a shuffled, turned jigsaw, for tests and fixtures.

use rand::{
    seq::{index, SliceRandom},
    Rng,
};
use std::{collections::HashSet, fmt::Write};

use crate::{
    error::{JigsawError, Result},
    tile::{Pixel, Pixels, Tile, TileId},
};

/// Redraws of a single border before giving up
pub const MAX_ATTEMPTS: usize = 256;

const MARKED_DENSITY: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct Scrambled {
    /// Tiles in random order, each randomly rotated and flipped
    pub tiles: Vec<Tile>,
    /// The tile interiors stitched in solved order
    pub picture: Pixels,
    /// Ids of the four corner tiles, sorted
    pub corner_ids: Vec<TileId>,
}

/// A random `side` by `side` puzzle of `tile_size` square tiles
pub fn scramble<R: Rng>(side: usize, tile_size: usize, rng: &mut R) -> Result<Scrambled> {
    assert!(tile_size >= 3, "tiles need an interior");
    let extent = side * (tile_size - 2);
    let picture = Pixels(
        (0..extent)
            .map(|_| {
                (0..extent)
                    .map(|_| random_pixel(rng, MARKED_DENSITY))
                    .collect()
            })
            .collect(),
    );
    return cut(&picture, tile_size, rng);
}

/// Cuts `picture` into tiles whose interiors are `tile_size - 2` wide.
///
/// Borders are drawn at random and shared by the two tiles on either side of
/// a seam. A border that reads the same both ways, or that repeats another
/// border, is redrawn.
pub fn cut<R: Rng>(picture: &Pixels, tile_size: usize, rng: &mut R) -> Result<Scrambled> {
    assert!(tile_size >= 3, "tiles need an interior");
    assert!(picture.is_square(), "picture must be square");
    let inner = tile_size - 2;
    assert!(
        picture.height() >= 2 * inner && picture.height() % inner == 0,
        "picture must split into at least 2x2 tiles"
    );
    let side = picture.height() / inner;

    let Some(lattice) = draw_lattice(picture, side, tile_size, rng) else {
        return Err(JigsawError::GeneratorExhausted { attempts: MAX_ATTEMPTS });
    };
    let step = tile_size - 1;
    let mut tiles = Vec::with_capacity(side * side);
    for r in 0..side {
        for c in 0..side {
            let pixels = lattice[r * step..r * step + tile_size]
                .iter()
                .map(|row| row[c * step..c * step + tile_size].to_vec())
                .collect();
            tiles.push(Tile::new((r * side + c) as TileId, Pixels(pixels)));
        }
    }
    return Ok(shuffle(tiles, picture.clone(), side, rng));
}

fn random_pixel<R: Rng>(rng: &mut R, density: f64) -> Pixel {
    if rng.gen_bool(density) {
        Pixel::Marked
    } else {
        Pixel::Unmarked
    }
}

/// Neighbouring tiles overlap by one pixel on the lattice, so a seam is the
/// same line of pixels in both tiles.
fn draw_lattice<R: Rng>(picture: &Pixels, side: usize, tile_size: usize, rng: &mut R) -> Option<Vec<Vec<Pixel>>> {
    let step = tile_size - 1;
    let inner = tile_size - 2;
    let extent = side * step + 1;
    let mut lattice = vec![vec![Pixel::Unmarked; extent]; extent];
    for (i, row) in lattice.iter_mut().enumerate() {
        for (j, pixel) in row.iter_mut().enumerate() {
            *pixel = if i % step == 0 || j % step == 0 {
                random_pixel(rng, 0.5)
            } else {
                picture[(i / step) * inner + i % step - 1][(j / step) * inner + j % step - 1]
            };
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    for segment in segments(side, step) {
        let mut tries = 0;
        loop {
            let edge: String = segment.iter().map(|&(i, j)| lattice[i][j].as_char()).collect();
            let reversed: String = edge.chars().rev().collect();
            if edge != reversed && !seen.contains(&edge) && !seen.contains(&reversed) {
                seen.insert(edge);
                break;
            }
            tries += 1;
            if tries >= MAX_ATTEMPTS {
                return None;
            }
            // corners are shared with the crossing border, so only the middle is redrawn
            for &(i, j) in &segment[1..segment.len() - 1] {
                lattice[i][j] = random_pixel(rng, 0.5);
            }
        }
    }
    return Some(lattice);
}

/// Lattice coordinates of every tile border, top to bottom for vertical ones
/// and left to right for horizontal ones
fn segments(side: usize, step: usize) -> Vec<Vec<(usize, usize)>> {
    let mut out = Vec::with_capacity(2 * side * (side + 1));
    for line in 0..=side {
        for k in 0..side {
            out.push((0..=step).map(|d| (line * step, k * step + d)).collect());
            out.push((0..=step).map(|d| (k * step + d, line * step)).collect());
        }
    }
    return out;
}

fn shuffle<R: Rng>(mut tiles: Vec<Tile>, picture: Pixels, side: usize, rng: &mut R) -> Scrambled {
    let ids: Vec<TileId> = index::sample(rng, 9000, tiles.len())
        .into_iter()
        .map(|i| 1000 + i as TileId)
        .collect();
    let mut corner_ids: Vec<TileId> = [0, side - 1, side * (side - 1), side * side - 1]
        .into_iter()
        .map(|i| ids[i])
        .collect();
    corner_ids.sort_unstable();

    for (tile, &id) in tiles.iter_mut().zip(ids.iter()) {
        tile.id = id;
        for _ in 0..rng.gen_range(0..4) {
            tile.rotate();
        }
        if rng.gen_bool(0.5) {
            tile.flip();
        }
    }
    tiles.shuffle(rng);
    return Scrambled { tiles, picture, corner_ids };
}

/// Writes tiles in the `Tile <id>:` input format
pub fn to_input_text(tiles: &[Tile]) -> String {
    let mut out = String::new();
    for tile in tiles {
        // writing to a String cannot fail
        let _ = write!(out, "Tile {}:\n{}\n\n", tile.id, tile.pixels);
    }
    return out;
}
