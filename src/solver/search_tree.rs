use crate::board::Board;

/// Handle of a node in a [SearchTree]. Handles are handed out in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

pub struct SearchNode {
    board: Board,
    moves: usize,
    priority: usize,
    parent: Option<NodeId>,
}

impl SearchNode {
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of moves from the root to this node.
    #[inline]
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Known cost plus estimated remaining cost, `moves + manhattan`.
    #[inline]
    pub fn priority(&self) -> usize {
        self.priority
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// An arena holding every node created by one search.
///
/// Nodes only ever point to nodes that were inserted before them, so parent chains are finite
/// and the `moves` along a chain strictly decrease towards the root.
#[derive(Default)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, board: Board, parent: Option<NodeId>) -> NodeId {
        let moves = match parent {
            None => 0,
            Some(parent) => self.node(parent).moves + 1,
        };
        let priority = moves + board.manhattan();
        let id = NodeId(self.nodes.len());
        self.nodes.push(SearchNode {
            board,
            moves,
            priority,
            parent,
        });
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn parent_board(&self, id: NodeId) -> Option<&Board> {
        self.node(id).parent().map(|parent| self.node(parent).board())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the boards from the root to the given node, both inclusive.
    pub fn path_to(&self, id: NodeId) -> Vec<Board> {
        let mut path = Vec::with_capacity(self.node(id).moves + 1);
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.node(id);
            path.push(node.board.clone());
            current = node.parent;
        }
        path.reverse();
        path
    }
}
