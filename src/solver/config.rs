/// How the twin board, whose search decides unsolvability, is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TwinSelection {
    /// Always swap the same pair of tiles, see [crate::Board::twin].
    #[default]
    Fixed,

    /// Swap a random pair of tiles, chosen by an RNG seeded with the given value.
    Seeded(u64),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub twin: TwinSelection,

    /// Remember every expanded board and never expand it again.
    /// This bounds memory by the number of reachable boards, at the cost of hashing every board.
    /// Without it, the search only avoids immediately undoing a move.
    pub closed_set: bool,

    /// Give up with [crate::SolverError::ExpansionLimit] after this many expansions, summed over both searches.
    pub max_expansions: Option<usize>,
}
