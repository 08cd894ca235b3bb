// 2x2 puzzle of 6x6 tiles that solves to
//   3212 9919
//   3429 5382
// with every tile turned away from that layout
pub(crate) const SMALL: &str = "\
Tile 9919:
###...
.#..##
....##
#.#.##
.##.##
#..###

Tile 5382:
#####.
###.##
######
.##..#
##..#.
.##.#.

Tile 3212:
#..###
..####
#..#.#
.#...#
#.##..
##.#..

Tile 3429:
####..
#.....
#.#.##
..#.#.
###..#
.##...
";

pub(crate) const SMALL_COMPOSITE: &str = "\
.#..#..#
#..###..
#.##....
...#####
....##.#
#.#.####
#.#.##..
..###..#";
