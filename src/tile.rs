use derive_more::{Deref, DerefMut, From, IsVariant};
use glam::UVec2;
use std::{
    fmt::{self, Display},
    ops::{Index, IndexMut, Neg},
    slice::Iter,
    str::FromStr,
};

use crate::error::{JigsawError, Result};

/// A unique identifier for a tile, taken from its `Tile <id>:` header
pub type TileId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum Pixel {
    Marked,
    Unmarked,
}

impl Pixel {
    pub const MARKED: char = '#';
    pub const UNMARKED: char = '.';

    pub fn from_char(c: char) -> Option<Self> {
        return match c {
            Self::MARKED => Some(Self::Marked),
            Self::UNMARKED => Some(Self::Unmarked),
            _ => None,
        };
    }

    pub fn as_char(self) -> char {
        return match self {
            Self::Marked => Self::MARKED,
            Self::Unmarked => Self::UNMARKED,
        };
    }
}

impl Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.as_char());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn iter() -> Iter<'static, Self> {
        return [Self::Top, Self::Right, Self::Bottom, Self::Left].iter();
    }
}

/// Returns the side facing this one across a seam
impl Neg for Side {
    type Output = Self;

    fn neg(self) -> Self::Output {
        return match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        };
    }
}

impl From<Side> for usize {
    fn from(value: Side) -> Self {
        match value {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        }
    }
}

impl<T> Index<Side> for [T; 4] {
    type Output = T;

    fn index(&self, index: Side) -> &Self::Output {
        let index: usize = index.into();
        return &self[index];
    }
}

impl<T> IndexMut<Side> for [T; 4] {
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        let index: usize = index.into();
        return &mut self[index];
    }
}

/// A row-major grid of pixels.
///
/// Tiles and the assembled picture are both `Pixels`, so the picture is
/// searched with the same rotate/flip primitives the tiles are oriented with.
#[derive(Deref, DerefMut, From, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pixels(pub Vec<Vec<Pixel>>);

impl Pixels {
    pub fn height(&self) -> usize {
        return self.0.len();
    }

    pub fn width(&self) -> usize {
        return self.0.first().map_or(0, Vec::len);
    }

    pub fn is_square(&self) -> bool {
        return self.0.iter().all(|row| row.len() == self.height());
    }

    pub fn get(&self, loc: UVec2) -> Option<Pixel> {
        return self
            .0
            .get(loc.y as usize)
            .and_then(|row| row.get(loc.x as usize))
            .copied();
    }

    /// Reads one border. Top and bottom run left to right, left and right
    /// run top to bottom.
    pub fn edge(&self, side: Side) -> String {
        let last = self.width() - 1;
        return match side {
            Side::Top => self.0[0].iter().map(|p| p.as_char()).collect(),
            Side::Bottom => self.0[self.height() - 1].iter().map(|p| p.as_char()).collect(),
            Side::Left => self.0.iter().map(|row| row[0].as_char()).collect(),
            Side::Right => self.0.iter().map(|row| row[last].as_char()).collect(),
        };
    }

    /// Rotates 90 degrees counter-clockwise in place.
    pub fn rotate(&mut self) {
        assert!(self.is_square(), "rotate needs a square grid");
        let n = self.height();
        let rotated: Vec<Vec<Pixel>> = (0..n)
            .map(|i| (0..n).map(|j| self.0[j][n - i - 1]).collect())
            .collect();
        self.0 = rotated;
    }

    /// Mirrors left to right in place.
    pub fn flip(&mut self) {
        assert!(self.is_square(), "flip needs a square grid");
        for row in self.0.iter_mut() {
            row.reverse();
        }
    }

    pub fn count_marked(&self) -> usize {
        return self.0.iter().flatten().filter(|p| p.is_marked()).count();
    }

    /// The grid with its one pixel border removed
    pub fn interior(&self) -> Pixels {
        let (h, w) = (self.height(), self.width());
        if h < 2 || w < 2 {
            return Pixels::default();
        }
        return Pixels(self.0[1..h - 1].iter().map(|row| row[1..w - 1].to_vec()).collect());
    }

    /// All 8 orientations: four rotations, then four rotations of the mirror
    /// image. Every orientation search in the crate uses this order.
    pub fn orientations(&self) -> Vec<Pixels> {
        let mut current = self.clone();
        let mut out = Vec::with_capacity(8);
        for _flip in 0..2 {
            for _rotation in 0..4 {
                out.push(current.clone());
                current.rotate();
            }
            current.flip();
        }
        return out;
    }
}

impl Display for Pixels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for pixel in row {
                write!(f, "{pixel}")?;
            }
        }
        return Ok(());
    }
}

impl FromStr for Pixels {
    type Err = JigsawError;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| crate::parse::parse_pixel_row(line, i + 1))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Pixels(rows));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub pixels: Pixels,
}

impl Tile {
    pub fn new(id: TileId, pixels: Pixels) -> Self {
        return Self { id, pixels };
    }

    pub fn side_len(&self) -> usize {
        return self.pixels.height();
    }

    pub fn edge(&self, side: Side) -> String {
        return self.pixels.edge(side);
    }

    /// Every border read both ways, so a match is found whatever the
    /// relative orientation of the two tiles.
    pub fn edge_signatures(&self) -> [String; 8] {
        let [top, right, bottom, left] = [Side::Top, Side::Right, Side::Bottom, Side::Left]
            .map(|side| self.edge(side));
        let reversed = |s: &String| s.chars().rev().collect::<String>();
        return [
            reversed(&top),
            top,
            reversed(&bottom),
            bottom,
            reversed(&left),
            left,
            reversed(&right),
            right,
        ];
    }

    pub fn rotate(&mut self) {
        self.pixels.rotate();
    }

    pub fn flip(&mut self) {
        self.pixels.flip();
    }

    pub fn count_marked(&self) -> usize {
        return self.pixels.count_marked();
    }
}
