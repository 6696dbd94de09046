//! This module defines the key and the statistics record of the game tree.

use crate::board::{FrozenBoard, Move};

/// A node in the game tree: a board position together with the move about to be played from
/// it. A bare frozen board with no move (`mv = None`) is the root node for that position.
///
/// Equality and hashing are purely structural, so transposed positions (reached by different
/// move orders) naturally collide onto the same node — the game tree is a graph, not a tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SearchNode {
    /// The frozen board *before* `mv` is played.
    pub board: FrozenBoard,
    /// The move about to be played, or `None` for a root node.
    pub mv: Option<Move>,
}

impl SearchNode {
    /// A root node: a bare position with no move to play from it yet.
    #[must_use]
    pub fn root(board: FrozenBoard) -> Self {
        Self { board, mv: None }
    }

    /// A child node: the position `board` together with the move `mv` to play from it.
    #[must_use]
    pub fn child(board: FrozenBoard, mv: Move) -> Self {
        Self { board, mv: Some(mv) }
    }
}

/// Mutable statistics attached to a [`SearchNode`] in the [`super::store::GameTree`].
///
/// The spec allows an optional `parent_visits_observed` counter here for implementations
/// that only hold a parent pointer ("graph form"). This one doesn't need it: the tree is
/// itself a `HashMap<SearchNode, ScoreRecord>`, so a parent's current visit count is always
/// an O(1) direct lookup by its own node key ("tree form", and also what the original
/// Python implementation does) — see DESIGN.md.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreRecord {
    /// Number of times this node has been visited during backpropagation.
    pub visits: u64,
    /// Sum of the rewards backpropagated through this node.
    pub reward_sum: u64,
    /// Cached UCT selection score, recomputed on each call to
    /// [`GameTree::selection_score`](super::store::GameTree::selection_score).
    pub selection_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Shape, Side};

    #[test]
    fn root_node_has_no_move() {
        let board = FrozenBoard::empty();
        let root = SearchNode::root(board);
        assert_eq!(root.mv, None);
        assert_eq!(root.board, board);
    }

    #[test]
    fn child_nodes_with_same_board_and_move_are_equal() {
        let board = FrozenBoard::empty();
        let mv = Move::new(0, 0, Shape::A, Side::Blue);
        assert_eq!(SearchNode::child(board, mv), SearchNode::child(board, mv));
    }
}
