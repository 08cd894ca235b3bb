use glam::UVec2;
use std::collections::HashSet;

use crate::{
    error::{Inconsistency, Result},
    tile::Pixels,
};

/// The shape searched for in the assembled picture. `#` cells must be marked,
/// every other cell is ignored.
pub const SEA_MONSTER: &str = concat!(
    "                  # \n",
    "#    ##    ##    ###\n",
    " #  #  #  #  #  #   ",
);

/// Marked cells of a template, as offsets from its top left corner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    offsets: Vec<UVec2>,
    size: UVec2,
}

impl Pattern {
    pub fn parse(template: &str) -> Self {
        let mut offsets = Vec::new();
        let mut size = UVec2::ZERO;
        for (y, line) in template.lines().enumerate() {
            for (x, c) in line.chars().enumerate() {
                if c == '#' {
                    offsets.push(UVec2::new(x as u32, y as u32));
                }
            }
            size.x = size.x.max(line.chars().count() as u32);
            size.y = y as u32 + 1;
        }
        return Self { offsets, size };
    }

    pub fn sea_monster() -> Self {
        return Self::parse(SEA_MONSTER);
    }

    /// Number of marked cells in one instance
    pub fn len(&self) -> usize {
        return self.offsets.len();
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounding box, width by height
    pub fn size(&self) -> UVec2 {
        return self.size;
    }

    pub fn offsets(&self) -> &[UVec2] {
        return &self.offsets;
    }
}

#[derive(Debug, Clone)]
pub struct PatternScanner {
    pattern: Pattern,
}

impl Default for PatternScanner {
    fn default() -> Self {
        return Self::new(Pattern::sea_monster());
    }
}

impl PatternScanner {
    pub fn new(pattern: Pattern) -> Self {
        return Self { pattern };
    }

    pub fn pattern(&self) -> &Pattern {
        return &self.pattern;
    }

    /// Every top left position where the pattern's bounding box fits
    fn anchors(&self, image: &Pixels) -> impl Iterator<Item = UVec2> {
        let dims = UVec2::new(image.width() as u32, image.height() as u32);
        let size = self.pattern.size;
        let fits = size.x > 0 && size.y > 0 && dims.x >= size.x && dims.y >= size.y;
        let last = if fits { dims - size + UVec2::ONE } else { UVec2::ZERO };
        return (0..last.y).flat_map(move |y| (0..last.x).map(move |x| UVec2::new(x, y)));
    }

    fn matches_at(&self, image: &Pixels, anchor: UVec2) -> bool {
        return self
            .pattern
            .offsets
            .iter()
            .all(|&offset| image.get(anchor + offset).map_or(false, |p| p.is_marked()));
    }

    pub fn count_matches(&self, image: &Pixels) -> usize {
        return self
            .anchors(image)
            .filter(|&anchor| self.matches_at(image, anchor))
            .count();
    }

    /// Union of the cells covered by every match
    pub fn matched_cells(&self, image: &Pixels) -> HashSet<UVec2> {
        return self
            .anchors(image)
            .filter(|&anchor| self.matches_at(image, anchor))
            .flat_map(|anchor| self.pattern.offsets.iter().map(move |&offset| anchor + offset))
            .collect();
    }

    /// Turns `image` through its 8 orientations and returns the first one
    /// holding at least one match, with the match count.
    pub fn orient_until_found(&self, image: Pixels) -> Result<(Pixels, usize)> {
        for (i, oriented) in image.orientations().into_iter().enumerate() {
            let matches = self.count_matches(&oriented);
            log::trace!("orientation {i}: {matches} matches");
            if matches > 0 {
                log::info!("found {matches} matches in orientation {i}");
                return Ok((oriented, matches));
            }
        }
        return Err(Inconsistency::PatternNotFound.into());
    }

    /// Marked pixels not covered by a match.
    ///
    /// Counts `matches * pattern.len()` as covered, which is only right when
    /// no two matches share a cell. Overlap is logged, not corrected.
    pub fn roughness(&self, image: &Pixels) -> usize {
        let matches = self.count_matches(image);
        let covered = matches * self.pattern.len();
        if matches > 1 {
            let union = self.matched_cells(image).len();
            if union < covered {
                log::warn!("{matches} matches overlap: {union} distinct cells, {covered} counted");
            }
        }
        return image.count_marked().saturating_sub(covered);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tile::Pixel;

    fn blank(side: usize) -> Pixels {
        return Pixels(vec![vec![Pixel::Unmarked; side]; side]);
    }

    fn stamp(image: &mut Pixels, pattern: &Pattern, anchor: UVec2) {
        for &offset in pattern.offsets() {
            let cell = anchor + offset;
            image[cell.y as usize][cell.x as usize] = Pixel::Marked;
        }
    }

    #[test]
    fn sea_monster_shape() {
        let monster = Pattern::sea_monster();
        assert_eq!(monster.len(), 15);
        assert_eq!(monster.size(), UVec2::new(20, 3));
        assert!(monster.offsets().contains(&UVec2::new(18, 0)));
        assert!(monster.offsets().contains(&UVec2::new(0, 1)));
        assert!(monster.offsets().contains(&UVec2::new(16, 2)));
    }

    #[test]
    fn embedded_match_is_found_in_one_orientation_only() {
        let scanner = PatternScanner::default();
        let mut image = blank(20);
        stamp(&mut image, scanner.pattern(), UVec2::new(0, 5));
        let counts: Vec<usize> = image
            .orientations()
            .iter()
            .map(|oriented| scanner.count_matches(oriented))
            .collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn orient_until_found_turns_image_upright() {
        let scanner = PatternScanner::default();
        let mut upright = blank(20);
        stamp(&mut upright, scanner.pattern(), UVec2::new(0, 5));
        let mut turned = upright.clone();
        turned.rotate();
        let (oriented, matches) = scanner.orient_until_found(turned).unwrap();
        assert_eq!(matches, 1);
        assert_eq!(oriented, upright);
    }

    #[test]
    fn anchor_at_far_corner_counts() {
        let scanner = PatternScanner::default();
        let mut image = blank(20);
        stamp(&mut image, scanner.pattern(), UVec2::new(0, 17));
        assert_eq!(scanner.count_matches(&image), 1);
        assert_eq!(scanner.matched_cells(&image).len(), 15);
    }

    #[test]
    fn pattern_larger_than_image_never_matches() {
        let scanner = PatternScanner::default();
        let full = Pixels(vec![vec![Pixel::Marked; 10]; 10]);
        assert_eq!(scanner.count_matches(&full), 0);
    }

    #[test]
    fn roughness_without_matches_is_marked_count() {
        let scanner = PatternScanner::default();
        let image: Pixels = "#.#\n.#.\n##.".parse().unwrap();
        assert_eq!(scanner.roughness(&image), image.count_marked());
        assert_eq!(scanner.roughness(&image), 5);
    }

    #[test]
    fn roughness_subtracts_each_match() {
        let scanner = PatternScanner::default();
        let mut image = blank(24);
        stamp(&mut image, scanner.pattern(), UVec2::new(1, 2));
        stamp(&mut image, scanner.pattern(), UVec2::new(3, 14));
        image[23][23] = Pixel::Marked;
        image[10][0] = Pixel::Marked;
        assert_eq!(scanner.count_matches(&image), 2);
        assert_eq!(scanner.roughness(&image), 2);
    }

    #[test]
    fn no_orientation_matches_is_fatal() {
        let scanner = PatternScanner::default();
        assert!(scanner.orient_until_found(blank(24)).is_err());
    }
}
