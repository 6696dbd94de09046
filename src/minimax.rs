//! Exhaustive minimax search with depth-preferring tie-breaking.
//!
//! Values are always expressed from `maximizing_side`'s perspective: +1 means a forced win
//! for `maximizing_side`, -1 a forced loss. There are no draws — Quantik always ends in a
//! win or a "no legal move" loss.

use crate::board::{Board, Move};
use crate::hand::HandsBySide;
use crate::moves;
use crate::piece::Side;

/// The outcome of a minimax search: the value from `maximizing_side`'s perspective, the best
/// move (`None` if `side_to_move` has no legal move), and the depth of the deepest
/// resolution reached along the chosen line (used only for the caller's own tie-breaking
/// against sibling calls, e.g. across workers or repeated queries).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// +1 if `maximizing_side` is forced to win, -1 if forced to lose.
    pub value: i32,
    /// The best move for `side_to_move`, or `None` if it has none.
    pub best_move: Option<Move>,
    /// The number of plies from this call down to the deepest resolved leaf along the
    /// returned line.
    pub depth: u32,
}

/// Search exhaustively from `board` with `side_to_move` to move, evaluated from
/// `maximizing_side`'s perspective.
#[must_use]
pub fn decide(board: &Board, hands: &HandsBySide, side_to_move: Side, maximizing_side: Side) -> Decision {
    let candidates: Vec<Move> = moves::canonical_moves(board, hands.get(side_to_move), side_to_move)
        .into_iter()
        .collect();

    if candidates.is_empty() {
        // `side_to_move` has no legal move and loses: good for maximizing_side iff
        // side_to_move is the opponent.
        let value = if side_to_move == maximizing_side { -1 } else { 1 };
        return Decision {
            value,
            best_move: None,
            depth: 0,
        };
    }

    let is_maximizing_turn = side_to_move == maximizing_side;
    let mut best_move = candidates[0];
    // Seed from an extreme so the first real candidate always replaces it.
    let mut best_value = if is_maximizing_turn { i32::MIN } else { i32::MAX };
    let mut best_depth = 0;

    for mv in candidates {
        let mut next_board = board.clone();
        let won = next_board
            .play(mv, false)
            .expect("a canonical candidate move must be legal");

        let (value, depth) = if won {
            // The side that just moved (side_to_move) wins outright.
            let value = if side_to_move == maximizing_side { 1 } else { -1 };
            (value, 1)
        } else {
            let mut next_hands = hands.clone();
            next_hands
                .get_mut(side_to_move)
                .remove(mv.shape)
                .expect("a canonical candidate move must come from the side's own hand");
            let child = decide(&next_board, &next_hands, side_to_move.other(), maximizing_side);
            (child.value, child.depth + 1)
        };

        let better = if is_maximizing_turn {
            value > best_value || (value == best_value && depth > best_depth)
        } else {
            value < best_value || (value == best_value && depth > best_depth)
        };
        if better {
            best_value = value;
            best_move = mv;
            best_depth = depth;
        }

        // Short-circuit: nothing beats a confirmed win for the maximizer or a confirmed
        // loss for the minimizer, so further siblings can't change the value — only a
        // deeper tie at the same extreme value could matter, which isn't worth the
        // remaining search.
        if is_maximizing_turn && best_value == 1 {
            break;
        }
        if !is_maximizing_turn && best_value == -1 {
            break;
        }
    }

    Decision {
        value: best_value,
        best_move: Some(best_move),
        depth: best_depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Shape;
    use crate::test_utils::{quantik_board, quantik_hand};

    #[test]
    fn s4_forced_winning_move_found_by_minimax() {
        let board = quantik_board! {
            (0, 0) => (Shape::A, Side::Blue),
            (0, 1) => (Shape::B, Side::Blue),
            (0, 2) => (Shape::C, Side::Blue),
            (1, 0) => (Shape::C, Side::Red),
            (2, 1) => (Shape::D, Side::Red),
            (2, 2) => (Shape::B, Side::Red),
        };
        let hands = HandsBySide {
            blue: quantik_hand![Shape::A, Shape::B, Shape::C, Shape::D],
            red: quantik_hand![Shape::A, Shape::B, Shape::C, Shape::D],
        };

        let decision = decide(&board, &hands, Side::Blue, Side::Blue);
        assert_eq!(decision.value, 1);
        assert_eq!(decision.best_move, Some(Move::new(0, 3, Shape::D, Side::Blue)));
    }

    #[test]
    fn no_legal_move_for_maximizer_scores_minus_one_with_no_move() {
        // An empty hand has no distinct shapes at all, so the move generator always
        // produces nothing for it regardless of the board — the cleanest way to force the
        // "no legal move" branch without having to fill the whole board.
        let board = Board::new();
        let hands = HandsBySide {
            blue: quantik_hand![],
            red: quantik_hand![Shape::A, Shape::B, Shape::C, Shape::D],
        };
        let decision = decide(&board, &hands, Side::Blue, Side::Blue);
        assert_eq!(decision.value, -1);
        assert_eq!(decision.best_move, None);
    }

    #[test]
    fn no_legal_move_for_minimizer_scores_plus_one_for_the_maximizer() {
        let board = Board::new();
        let hands = HandsBySide {
            blue: quantik_hand![Shape::A, Shape::B, Shape::C, Shape::D],
            red: quantik_hand![],
        };
        let decision = decide(&board, &hands, Side::Red, Side::Blue);
        assert_eq!(decision.value, 1);
        assert_eq!(decision.best_move, None);
    }
}
