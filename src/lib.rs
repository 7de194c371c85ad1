mod board;
mod generator;
mod parse;
mod solver;
mod utils;

pub use board::{Board, BoardError, Tile, BLANK};
pub use generator::{random_walk, shuffled, shuffled_solvable};
pub use parse::{parse_board, ParseError};
pub use solver::{
    solve, SearchStats, Solution, Solver, SolverConfig, SolverError, SolverStats, TwinSelection,
};
pub use utils::count_inversions;
