use itertools::Itertools;

use crate::board::{Tile, BLANK};

/// Counts the pairs of numbered tiles that appear in the wrong order, reading the board row by row.
pub fn count_inversions(tiles: &[Tile]) -> usize {
    tiles
        .iter()
        .filter(|&&tile| tile != BLANK)
        .tuple_combinations()
        .filter(|(first, second)| first > second)
        .count()
}

/// Decides whether a board can reach the goal, using the parity of its permutation.
/// With an odd width, every move keeps the inversion count parity, so it has to be even like the goal's.
/// With an even width, vertical moves flip it, so the row of the blank has to be taken into account.
pub fn has_solvable_parity(dimension: usize, tiles: &[Tile], blank_row: usize) -> bool {
    let inversions = count_inversions(tiles);
    if dimension % 2 == 1 {
        inversions % 2 == 0
    } else {
        (inversions + blank_row) % 2 == 1
    }
}
