use rand::{seq::SliceRandom, Rng};

use super::board::{Board, BoardError, Tile};

/// Generates a board by making `steps` random moves from the goal, never undoing the previous move.
/// The result is always solvable in at most `steps` moves.
pub fn random_walk<R: Rng + ?Sized>(
    dimension: usize,
    steps: usize,
    rng: &mut R,
) -> Result<Board, BoardError> {
    let mut board = Board::goal(dimension)?;
    let mut previous: Option<Board> = None;
    for _ in 0..steps {
        let candidates: Vec<Board> = board
            .neighbors()
            .filter(|neighbor| previous.as_ref() != Some(neighbor))
            .collect();
        let Some(next) = candidates.choose(rng).cloned() else {
            // A 1x1 board can't move
            break;
        };
        previous = Some(std::mem::replace(&mut board, next));
    }
    Ok(board)
}

/// Generates a board with a uniformly random arrangement of tiles. Half of these aren't solvable.
pub fn shuffled<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Board, BoardError> {
    let mut tiles: Vec<Tile> = (0..(dimension * dimension) as Tile).collect();
    tiles.shuffle(rng);
    Board::from_tiles(dimension, tiles)
}

/// Like [shuffled], but reshuffles until the board is solvable.
pub fn shuffled_solvable<R: Rng + ?Sized>(
    dimension: usize,
    rng: &mut R,
) -> Result<Board, BoardError> {
    loop {
        let board = shuffled(dimension, rng)?;
        if board.has_solvable_parity() {
            return Ok(board);
        }
    }
}
