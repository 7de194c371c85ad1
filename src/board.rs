use std::fmt;
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::utils::has_solvable_parity;

pub type Tile = u32;

/// The tile value representing the empty cell.
pub const BLANK: Tile = 0;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board dimension must be positive")]
    ZeroDimension,

    #[error("Board has {rows} rows but row {row} has {len} tiles")]
    NotSquare { rows: usize, row: usize, len: usize },

    #[error("Board has no blank tile")]
    MissingBlank,

    #[error("Board has more than one blank tile")]
    MultipleBlanks,
}

/// A [Board] is one configuration of an n-by-n sliding puzzle.
/// Each cell contains a tile in 0..n*n where 0 is the blank.
/// The goal configuration has the tiles 1..n*n in row-major order, followed by the blank.
///
/// Boards are never mutated. Moving a tile creates a new [Board].
#[derive(Clone, Debug)]
pub struct Board {
    dimension: usize,

    // Cells are ordered by rows, first left-to-right, then top-to-bottom.
    tiles: Box<[Tile]>,

    // Invariant: the fields below are derived from `tiles` and are computed once on construction.
    blank: usize,
    hamming: usize,
    manhattan: usize,
}

impl Board {
    /// Creates a board from its rows, copying the tiles.
    ///
    /// Only the shape is checked. The tiles are trusted to be a permutation of 0..n*n,
    /// use [crate::parse_board] to validate input from outside.
    pub fn new<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, BoardError> {
        let dimension = rows.len();
        let mut tiles = Vec::with_capacity(dimension * dimension);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dimension {
                return Err(BoardError::NotSquare {
                    rows: dimension,
                    row,
                    len: values.len(),
                });
            }
            tiles.extend_from_slice(values);
        }
        Self::from_tiles(dimension, tiles)
    }

    /// Returns the solved board of the given dimension.
    pub fn goal(dimension: usize) -> Result<Self, BoardError> {
        let num_cells = dimension * dimension;
        let tiles = (1..num_cells as Tile).chain(std::iter::once(BLANK)).collect();
        Self::from_tiles(dimension, tiles)
    }

    pub(crate) fn from_tiles(dimension: usize, tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if dimension == 0 {
            return Err(BoardError::ZeroDimension);
        }
        assert_eq!(dimension * dimension, tiles.len());
        let blank = tiles
            .iter()
            .position(|&tile| tile == BLANK)
            .ok_or(BoardError::MissingBlank)?;
        if tiles[blank + 1..].contains(&BLANK) {
            return Err(BoardError::MultipleBlanks);
        }
        Ok(Self::with_blank(dimension, tiles.into_boxed_slice(), blank))
    }

    fn with_blank(dimension: usize, tiles: Box<[Tile]>, blank: usize) -> Self {
        debug_assert_eq!(BLANK, tiles[blank]);
        let mut hamming = 0;
        let mut manhattan = 0;
        for (index, &tile) in tiles.iter().enumerate() {
            if tile != BLANK {
                let distance = distance_to_goal(dimension, tile, index);
                manhattan += distance;
                if distance != 0 {
                    hamming += 1;
                }
            }
        }
        Self {
            dimension,
            tiles,
            blank,
            hamming,
            manhattan,
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> Tile {
        assert!(row < self.dimension && col < self.dimension);
        self.tiles[row * self.dimension + col]
    }

    /// All tiles in row-major order.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.tiles.chunks(self.dimension)
    }

    /// Returns the (row, col) of the blank.
    #[inline]
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.dimension, self.blank % self.dimension)
    }

    /// Number of tiles that are not in their goal position. The blank doesn't count.
    #[inline]
    pub fn hamming(&self) -> usize {
        self.hamming
    }

    /// Sum of the manhattan distances between each tile and its goal position. The blank doesn't count.
    /// This never overestimates the number of moves left, and every move changes it by exactly one.
    #[inline]
    pub fn manhattan(&self) -> usize {
        self.manhattan
    }

    #[inline]
    pub fn is_goal(&self) -> bool {
        self.hamming == 0
    }

    /// Returns all boards that are one move away.
    /// They're generated in a fixed order: the blank moves left, right, up, down.
    pub fn neighbors(&self) -> impl Iterator<Item = Board> + '_ {
        let dimension = self.dimension;
        let (row, col) = self.blank_position();
        let left = (col > 0).then(|| self.blank - 1);
        let right = (col + 1 < dimension).then(|| self.blank + 1);
        let up = (row > 0).then(|| self.blank - dimension);
        let down = (row + 1 < dimension).then(|| self.blank + dimension);
        [left, right, up, down]
            .into_iter()
            .flatten()
            .map(move |target| self.slide_into_blank(target))
    }

    // Moves the tile at `from` into the blank. Only that tile changes position,
    // so the heuristics are updated from its old and new distance instead of being recomputed.
    fn slide_into_blank(&self, from: usize) -> Board {
        let tile = self.tiles[from];
        let old_distance = distance_to_goal(self.dimension, tile, from);
        let new_distance = distance_to_goal(self.dimension, tile, self.blank);

        let mut tiles = self.tiles.clone();
        tiles.swap(from, self.blank);

        let mut hamming = self.hamming;
        if old_distance == 0 {
            hamming += 1;
        } else if new_distance == 0 {
            hamming -= 1;
        }

        Board {
            dimension: self.dimension,
            tiles,
            blank: from,
            hamming,
            manhattan: self.manhattan + new_distance - old_distance,
        }
    }

    /// Returns a board with two adjacent non-blank tiles in the same row swapped.
    /// The pair is fixed: the first two tiles of the first row, or of the second row if the blank is in the first row.
    ///
    /// Exactly one of a board and its twin is solvable.
    /// Returns [None] for a 1x1 board, which doesn't have two tiles.
    pub fn twin(&self) -> Option<Board> {
        if self.dimension < 2 {
            return None;
        }
        let row = if self.blank < self.dimension { 1 } else { 0 };
        let first = row * self.dimension;
        Some(self.swap_tiles(first, first + 1))
    }

    /// Like [Board::twin], but the pair of tiles is chosen randomly.
    pub fn random_twin<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Board> {
        let dimension = self.dimension;
        let candidates: Vec<usize> = (0..dimension)
            .flat_map(|row| (0..dimension.saturating_sub(1)).map(move |col| row * dimension + col))
            .filter(|&index| self.tiles[index] != BLANK && self.tiles[index + 1] != BLANK)
            .collect();
        candidates
            .choose(rng)
            .map(|&index| self.swap_tiles(index, index + 1))
    }

    fn swap_tiles(&self, first: usize, second: usize) -> Board {
        assert!(first != self.blank && second != self.blank, "Twin swaps must not touch the blank");
        let mut tiles = self.tiles.clone();
        tiles.swap(first, second);
        Self::with_blank(self.dimension, tiles, self.blank)
    }

    /// Decides solvability from the permutation parity, without searching.
    pub fn has_solvable_parity(&self) -> bool {
        has_solvable_parity(self.dimension, &self.tiles, self.blank_position().0)
    }
}

// Manhattan distance between cell `index` and the goal cell of `tile`.
#[inline]
fn distance_to_goal(dimension: usize, tile: Tile, index: usize) -> usize {
    let goal = tile as usize - 1;
    (index / dimension).abs_diff(goal / dimension) + (index % dimension).abs_diff(goal % dimension)
}

// Equality and hashing only look at the tiles, the remaining fields are derived from them.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension && self.tiles == other.tiles
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension.hash(state);
        self.tiles.hash(state);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.tiles.iter().max().copied().unwrap_or(BLANK).to_string().len();
        writeln!(f, "{}", self.dimension)?;
        write!(
            f,
            "{}",
            self.rows()
                .map(|row| row.iter().map(|tile| format!("{:>width$}", tile)).join(" "))
                .join("\n")
        )
    }
}
