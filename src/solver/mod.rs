use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use super::board::Board;

mod config;
mod search;
mod search_tree;

pub use config::{SolverConfig, TwinSelection};
pub use search::SearchStats;
use search::{Search, Step};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolverError {
    #[error("Neither the board nor its twin can reach the goal. The tiles are not a permutation of 0..n*n")]
    SearchExhausted,

    #[error("Gave up after {0} expansions")]
    ExpansionLimit(usize),
}

/// The result of solving a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    /// `path` contains every board from the initial board to the goal, both inclusive.
    Solved { path: Vec<Board> },
    Unsolvable,
}

impl Solution {
    pub fn is_solvable(&self) -> bool {
        matches!(self, Solution::Solved { .. })
    }

    /// Minimum number of moves to reach the goal, or [None] if the board is unsolvable.
    pub fn moves(&self) -> Option<usize> {
        self.path().map(|path| path.len() - 1)
    }

    pub fn path(&self) -> Option<&[Board]> {
        match self {
            Solution::Solved { path } => Some(path),
            Solution::Unsolvable => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub primary: SearchStats,
    pub twin: SearchStats,
}

impl SolverStats {
    pub fn expanded(&self) -> usize {
        self.primary.expanded + self.twin.expanded
    }
}

#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self, initial: &Board) -> Result<Solution, SolverError> {
        self.solve_with_stats(initial).map(|(solution, _)| solution)
    }

    /// Solves the board with A*, and at the same time solves its twin.
    ///
    /// Exactly one of the two is solvable, so one of the searches reaches the goal after finitely many expansions.
    /// Both searches are advanced in lockstep, one expansion each, so the unsolvable one can't starve the other.
    /// If the twin reaches the goal first, the initial board is unsolvable.
    pub fn solve_with_stats(
        &self,
        initial: &Board,
    ) -> Result<(Solution, SolverStats), SolverError> {
        if initial.is_goal() {
            let solution = Solution::Solved {
                path: vec![initial.clone()],
            };
            return Ok((solution, SolverStats::default()));
        }

        let twin = match self.config.twin {
            TwinSelection::Fixed => initial.twin(),
            TwinSelection::Seeded(seed) => initial.random_twin(&mut StdRng::seed_from_u64(seed)),
        }
        .expect("Every board with dimension of at least 2 has a twin, and 1x1 boards are always the goal");

        debug!(
            "Solving {0}x{0} board with manhattan distance {1}, twin has manhattan distance {2}",
            initial.dimension(),
            initial.manhattan(),
            twin.manhattan()
        );

        let mut primary = Some(Search::new(initial.clone(), self.config.closed_set));
        let mut twin = Some(Search::new(twin, self.config.closed_set));
        let mut stats = SolverStats::default();

        loop {
            if let Some(limit) = self.config.max_expansions {
                if stats.expanded() >= limit {
                    debug!("Giving up after {} expansions", stats.expanded());
                    return Err(SolverError::ExpansionLimit(limit));
                }
            }

            if let Some(search) = &mut primary {
                match search.step() {
                    Step::Goal(id) => {
                        stats.primary = search.stats();
                        let solution = Solution::Solved {
                            path: search.path_to(id),
                        };
                        debug!("Solved in {:?} moves, {:?}", solution.moves(), stats);
                        return Ok((solution, stats));
                    }
                    Step::Expanded => {
                        stats.primary = search.stats();
                    }
                    Step::Exhausted => {
                        // The board is unsolvable. Keep going until the twin search confirms it.
                        debug!("Primary search exhausted after {:?}", search.stats());
                        primary = None;
                    }
                }
            }

            if let Some(search) = &mut twin {
                match search.step() {
                    Step::Goal(_) => {
                        stats.twin = search.stats();
                        debug!("Twin reached the goal, board is unsolvable, {:?}", stats);
                        return Ok((Solution::Unsolvable, stats));
                    }
                    Step::Expanded => {
                        stats.twin = search.stats();
                    }
                    Step::Exhausted => {
                        // The twin is unsolvable, so the initial board is solvable. Keep going until we have the path.
                        debug!("Twin search exhausted after {:?}", search.stats());
                        twin = None;
                    }
                }
            }

            if primary.is_none() && twin.is_none() {
                return Err(SolverError::SearchExhausted);
            }
        }
    }

    /// Solves independent boards in parallel. Results are in the same order as `boards`.
    pub fn solve_all(&self, boards: &[Board]) -> Vec<Result<Solution, SolverError>> {
        boards.par_iter().map(|board| self.solve(board)).collect()
    }
}

/// Solves the board with the default [SolverConfig].
pub fn solve(initial: &Board) -> Result<Solution, SolverError> {
    Solver::default().solve(initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Tile;
    use crate::generator::{random_walk, shuffled};
    use itertools::Itertools;
    use proptest::prelude::*;

    fn board(rows: &[&[Tile]]) -> Board {
        Board::new(rows).unwrap()
    }

    fn with_closed_set() -> Solver {
        Solver::new(SolverConfig {
            closed_set: true,
            ..SolverConfig::default()
        })
    }

    // Checks that consecutive boards are one move apart and that no move is immediately undone.
    fn assert_valid_path(initial: &Board, solution: &Solution) {
        let path = solution.path().unwrap();
        assert_eq!(initial, &path[0]);
        assert!(path.last().unwrap().is_goal());
        assert_eq!(solution.moves(), Some(path.len() - 1));
        for (previous, next) in path.iter().tuple_windows() {
            assert!(previous.neighbors().any(|neighbor| &neighbor == next));
        }
        for (first, _, third) in path.iter().tuple_windows() {
            assert_ne!(first, third);
        }
    }

    #[test]
    fn goal() {
        let goal = Board::goal(3).unwrap();
        let (solution, stats) = Solver::default().solve_with_stats(&goal).unwrap();
        assert!(solution.is_solvable());
        assert_eq!(Some(0), solution.moves());
        assert_eq!(Some(&[goal][..]), solution.path());
        assert_eq!(SolverStats::default(), stats);
    }

    #[test]
    fn single_tile() {
        let board = board(&[&[0]]);
        let solution = solve(&board).unwrap();
        assert_eq!(Some(0), solution.moves());
        assert_eq!(Some(&[board][..]), solution.path());
    }

    #[test]
    fn solvable_2x2() {
        let initial = board(&[&[0, 1], &[3, 2]]);
        let solution = solve(&initial).unwrap();
        assert_eq!(Some(2), solution.moves());
        assert_eq!(
            Solution::Solved {
                path: vec![
                    initial,
                    board(&[&[1, 0], &[3, 2]]),
                    board(&[&[1, 2], &[3, 0]]),
                ]
            },
            solution
        );
    }

    #[test]
    fn one_move() {
        let initial = board(&[&[1, 2], &[0, 3]]);
        let solution = solve(&initial).unwrap();
        assert_eq!(Some(1), solution.moves());
        assert_valid_path(&initial, &solution);
    }

    #[test]
    fn not_solvable_2x2() {
        let (solution, stats) = Solver::default()
            .solve_with_stats(&board(&[&[1, 0], &[2, 3]]))
            .unwrap();
        assert!(!solution.is_solvable());
        assert_eq!(None, solution.moves());
        assert_eq!(None, solution.path());
        assert_eq!(Solution::Unsolvable, solution);
        // The twin 1 0 / 3 2 is one move from the goal, which it pops in its second step.
        assert_eq!(2, stats.primary.expanded);
        assert_eq!(1, stats.twin.expanded);
    }

    #[test]
    fn solvable_3x3() {
        let initial = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        let solution = solve(&initial).unwrap();
        assert_eq!(Some(4), solution.moves());
        assert_valid_path(&initial, &solution);
    }

    #[test]
    fn solvable_3x3_difficult() {
        let initial = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        let plain = solve(&initial).unwrap();
        let closed = with_closed_set().solve(&initial).unwrap();
        assert_valid_path(&initial, &plain);
        assert_valid_path(&initial, &closed);
        assert_eq!(plain.moves(), closed.moves());
    }

    #[test]
    fn not_solvable_3x3() {
        // Twin is the goal
        let solution = solve(&board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]])).unwrap();
        assert_eq!(Solution::Unsolvable, solution);

        let solution = solve(&board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]])).unwrap();
        assert!(!solution.is_solvable());
        assert_eq!(None, solution.moves());
    }

    #[test]
    fn seeded_twin() {
        let solver = Solver::new(SolverConfig {
            twin: TwinSelection::Seeded(7),
            ..SolverConfig::default()
        });
        let solvable = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        assert_eq!(Some(4), solver.solve(&solvable).unwrap().moves());
        let not_solvable = board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]);
        assert_eq!(Solution::Unsolvable, solver.solve(&not_solvable).unwrap());
    }

    #[test]
    fn exactly_one_of_board_and_twin_is_solvable_2x2() {
        for tiles in (0..4 as Tile).permutations(4) {
            let initial = Board::new(&[&tiles[0..2], &tiles[2..4]]).unwrap();
            let twin = initial.twin().unwrap();
            let solution = solve(&initial).unwrap();
            let twin_solution = solve(&twin).unwrap();
            assert_ne!(solution.is_solvable(), twin_solution.is_solvable());
            assert_eq!(initial.has_solvable_parity(), solution.is_solvable());
            if solution.is_solvable() {
                assert_valid_path(&initial, &solution);
            }
        }
    }

    #[test]
    fn malformed_board_exhausts_with_closed_set() {
        // The goal needs a 3, so neither this board nor its twin (the same board) can reach it.
        let malformed = board(&[&[1, 1], &[2, 0]]);
        assert_eq!(
            Err(SolverError::SearchExhausted),
            with_closed_set().solve(&malformed)
        );
    }

    #[test]
    fn malformed_board_with_seeded_twin_exhausts() {
        let solver = Solver::new(SolverConfig {
            twin: TwinSelection::Seeded(3),
            closed_set: true,
            max_expansions: Some(100),
        });
        let malformed = board(&[&[1, 1], &[2, 0]]);
        assert_eq!(Err(SolverError::SearchExhausted), solver.solve(&malformed));
    }

    #[test]
    fn malformed_board_hits_expansion_limit() {
        let solver = Solver::new(SolverConfig {
            max_expansions: Some(1000),
            ..SolverConfig::default()
        });
        let malformed = board(&[&[1, 1], &[2, 0]]);
        assert_eq!(
            Err(SolverError::ExpansionLimit(1000)),
            solver.solve(&malformed)
        );
    }

    #[test]
    fn expansion_limit_not_hit() {
        let solver = Solver::new(SolverConfig {
            max_expansions: Some(1000),
            ..SolverConfig::default()
        });
        let initial = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        assert_eq!(Some(4), solver.solve(&initial).unwrap().moves());
    }

    #[test]
    fn solve_all_keeps_order() {
        let boards = vec![
            board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]),
            board(&[&[1, 0], &[2, 3]]),
            Board::goal(4).unwrap(),
            board(&[&[0, 1], &[3, 2]]),
        ];
        let moves: Vec<Option<usize>> = Solver::default()
            .solve_all(&boards)
            .into_iter()
            .map(|solution| solution.unwrap().moves())
            .collect();
        assert_eq!(vec![Some(4), None, Some(0), Some(2)], moves);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn random_walk_solution_is_valid(seed in any::<u64>(), steps in 0usize..16) {
            let initial = random_walk(3, steps, &mut StdRng::seed_from_u64(seed)).unwrap();
            let solution = solve(&initial).unwrap();
            prop_assert!(solution.moves().unwrap() <= steps);
            prop_assert!(solution.moves().unwrap() >= initial.manhattan());
            assert_valid_path(&initial, &solution);
            prop_assert_eq!(solution.moves(), with_closed_set().solve(&initial).unwrap().moves());
        }

        #[test]
        fn agrees_with_parity_3x3(seed in any::<u64>()) {
            let initial = shuffled(3, &mut StdRng::seed_from_u64(seed)).unwrap();
            let solution = with_closed_set().solve(&initial).unwrap();
            prop_assert_eq!(initial.has_solvable_parity(), solution.is_solvable());
        }
    }
}
