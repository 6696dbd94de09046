//! Picks which search algorithm answers a given position.
//!
//! A single tunable threshold on the number of pieces already on the board: broad MCTS
//! exploration pays off early, when the game tree is still far too wide for minimax to
//! exhaust; once enough pieces are down, minimax can finish the remaining tree outright.

use crate::board::Board;
use crate::hand::Hand;

/// Which search algorithm to use for a position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// Broad Monte Carlo exploration; used early game.
    Mcts,
    /// Exhaustive search; used once the tree has narrowed enough.
    Minimax,
}

/// Pieces-on-board threshold at or below which [`select`] prefers [`Strategy::Mcts`].
///
/// A tunable design parameter, not a rule of the game — see DESIGN.md.
pub const MCTS_PIECE_THRESHOLD: usize = 4;

/// Choose a strategy given both hands. `_board` is part of the interface but unused by the
/// current (hand-count-only) threshold rule.
#[must_use]
pub fn select(_board: &Board, current_hand: &Hand, other_hand: &Hand) -> Strategy {
    let pieces_on_board = 16 - current_hand.len() - other_hand.len();

    if pieces_on_board <= MCTS_PIECE_THRESHOLD {
        Strategy::Mcts
    } else {
        Strategy::Minimax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Shape, Side};
    use crate::test_utils::quantik_board;

    #[test]
    fn empty_board_prefers_mcts() {
        let board = Board::new();
        let current = Hand::new_full();
        let other = Hand::new_full();
        assert_eq!(select(&board, &current, &other), Strategy::Mcts);
    }

    #[test]
    fn depleted_hands_prefer_minimax() {
        let board = quantik_board! {
            (0, 0) => (Shape::A, Side::Blue),
            (0, 1) => (Shape::B, Side::Blue),
            (0, 2) => (Shape::C, Side::Blue),
            (1, 0) => (Shape::C, Side::Red),
            (2, 1) => (Shape::D, Side::Red),
            (2, 2) => (Shape::B, Side::Red),
        };
        let mut current = Hand::new_full();
        current.remove(Shape::A).unwrap();
        current.remove(Shape::B).unwrap();
        current.remove(Shape::C).unwrap();
        let mut other = Hand::new_full();
        other.remove(Shape::C).unwrap();
        other.remove(Shape::D).unwrap();
        other.remove(Shape::B).unwrap();

        assert_eq!(select(&board, &current, &other), Strategy::Minimax);
    }

    #[test]
    fn threshold_boundary_is_inclusive_of_mcts() {
        // Exactly MCTS_PIECE_THRESHOLD pieces down still selects Mcts; this test only
        // exercises the arithmetic threshold, not board legality.
        let board = Board::new();
        let mut current = Hand::new_full();
        current.remove(Shape::A).unwrap();
        current.remove(Shape::A).unwrap();
        current.remove(Shape::B).unwrap();
        current.remove(Shape::B).unwrap();
        let other = Hand::new_full();

        assert_eq!(16 - current.len() - other.len(), MCTS_PIECE_THRESHOLD);
        assert_eq!(select(&board, &current, &other), Strategy::Mcts);
    }
}
