use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use log::trace;

use super::search_tree::{NodeId, SearchTree};
use crate::board::Board;

/// Counters for one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes that were popped from the frontier and expanded.
    pub expanded: usize,
    /// Nodes that were created, including the root.
    pub created: usize,
    /// Largest number of nodes waiting in the frontier at the same time.
    pub max_frontier: usize,
}

pub enum Step {
    /// The popped node is the goal. The search is done and must not be stepped again.
    Goal(NodeId),
    Expanded,
    /// The frontier is empty, the goal isn't reachable.
    Exhausted,
}

/// One A* search from a single root board, advanced one expansion at a time.
pub struct Search {
    tree: SearchTree,

    // Min-priority queue. Nodes with equal priority are popped in insertion order.
    frontier: BinaryHeap<(Reverse<usize>, Reverse<NodeId>)>,

    // Boards that were already expanded. Only kept if a closed set was requested, otherwise
    // the only protection against cycles is that a move is never immediately undone.
    closed: Option<HashSet<Board>>,

    stats: SearchStats,
}

impl Search {
    pub fn new(root: Board, closed_set: bool) -> Self {
        let mut res = Self {
            tree: SearchTree::new(),
            frontier: BinaryHeap::new(),
            closed: closed_set.then(HashSet::new),
            stats: SearchStats::default(),
        };
        let root = res.tree.insert(root, None);
        res.push(root);
        res
    }

    fn push(&mut self, id: NodeId) {
        let priority = self.tree.node(id).priority();
        self.frontier.push((Reverse(priority), Reverse(id)));
        self.stats.created = self.tree.len();
        self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
    }

    fn pop(&mut self) -> Option<NodeId> {
        while let Some((_, Reverse(id))) = self.frontier.pop() {
            if let Some(closed) = &self.closed {
                if closed.contains(self.tree.node(id).board()) {
                    // Reached on a different path before. Consistency of the heuristic means that path wasn't longer.
                    continue;
                }
            }
            return Some(id);
        }
        None
    }

    /// Pops the node with the lowest priority. If it isn't the goal, its children are added to the frontier.
    pub fn step(&mut self) -> Step {
        let Some(id) = self.pop() else {
            return Step::Exhausted;
        };
        let node = self.tree.node(id);
        if node.board().is_goal() {
            return Step::Goal(id);
        }

        let parent_board = self.tree.parent_board(id);
        let children: Vec<Board> = node
            .board()
            .neighbors()
            .filter(|child| Some(child) != parent_board)
            .filter(|child| match &self.closed {
                Some(closed) => !closed.contains(child),
                None => true,
            })
            .collect();
        trace!(
            "expanding node {:?} with moves {} and priority {} into {} children",
            id,
            node.moves(),
            node.priority(),
            children.len()
        );
        if let Some(closed) = &mut self.closed {
            closed.insert(self.tree.node(id).board().clone());
        }

        for child in children {
            let child = self.tree.insert(child, Some(id));
            self.push(child);
        }
        self.stats.expanded += 1;
        Step::Expanded
    }

    pub fn path_to(&self, id: NodeId) -> Vec<Board> {
        self.tree.path_to(id)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}
