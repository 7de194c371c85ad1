use std::str::FromStr;

use bitvec::prelude::*;
use thiserror::Error;

use crate::board::{Board, BoardError, Tile};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Puzzle input is empty")]
    Empty,

    #[error("Invalid token {token:?}, expected a non-negative integer")]
    InvalidToken { token: String },

    #[error("Expected {expected} tiles but found {found}")]
    TileCount { expected: usize, found: usize },

    #[error("Unexpected token {token:?} after the last tile")]
    TrailingToken { token: String },

    #[error("Tile {tile} is out of range for a {dimension}x{dimension} board")]
    OutOfRange { tile: Tile, dimension: usize },

    #[error("Tile {0} appears more than once")]
    Duplicate(Tile),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Parses a board from whitespace separated text: the dimension `n` followed by the `n*n` tiles in row-major order.
///
/// ```text
/// 3
///  0  1  3
///  4  2  5
///  7  8  6
/// ```
///
/// Unlike [Board::new], this checks that the tiles are a permutation of 0..n*n.
pub fn parse_board(input: &str) -> Result<Board, ParseError> {
    let mut tokens = input.split_whitespace();
    let dimension: usize = parse_token(tokens.next().ok_or(ParseError::Empty)?)?;
    if dimension == 0 {
        return Err(BoardError::ZeroDimension.into());
    }

    let expected = dimension.saturating_mul(dimension);
    let tiles = tokens
        .by_ref()
        .take(expected)
        .map(parse_token)
        .collect::<Result<Vec<Tile>, ParseError>>()?;
    if tiles.len() != expected {
        return Err(ParseError::TileCount {
            expected,
            found: tiles.len(),
        });
    }
    if let Some(token) = tokens.next() {
        return Err(ParseError::TrailingToken {
            token: token.to_string(),
        });
    }

    check_permutation(dimension, &tiles)?;
    Ok(Board::from_tiles(dimension, tiles)?)
}

fn parse_token<T: FromStr>(token: &str) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidToken {
        token: token.to_string(),
    })
}

fn check_permutation(dimension: usize, tiles: &[Tile]) -> Result<(), ParseError> {
    let mut seen = bitvec![0; tiles.len()];
    for &tile in tiles {
        let index = tile as usize;
        if index >= tiles.len() {
            return Err(ParseError::OutOfRange { tile, dimension });
        }
        if seen.replace(index, true) {
            return Err(ParseError::Duplicate(tile));
        }
    }
    Ok(())
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_board(input)
    }
}
