//! This module handles legal move enumeration, in both exhaustive and symmetry-canonical
//! form.
//!
//! Exhaustive mode enumerates every legal `(row, col, shape)` for a side's hand. Canonical
//! mode additionally collapses two sources of redundancy: shapes not yet on the board are
//! mutually indistinguishable (only one representative is kept), and coordinates related by
//! a symmetry the *current* board actually possesses are collapsed to a canonical half (see
//! [`Board`]'s incrementally-tracked [`crate::board::SymmetryFlags`]).

use std::collections::HashSet;

use itertools::Itertools;

use crate::board::{Board, Move};
use crate::hand::Hand;
use crate::piece::{Shape, Side};

/// Every legal `(row, col, shape, side)` for `side`'s hand on `board`. Order is irrelevant;
/// the result is a set.
#[must_use]
pub fn exhaustive_moves(board: &Board, hand: &Hand, side: Side) -> HashSet<Move> {
    generate_moves(board, &hand.distinct_shapes(), side)
}

/// The symmetry- and shape-equivalence-reduced subset of [`exhaustive_moves`].
///
/// Never prunes a move whose played position is not symmetric to another kept move under
/// the symmetries the board currently possesses (see DESIGN.md for why this holds).
#[must_use]
pub fn canonical_moves(board: &Board, hand: &Hand, side: Side) -> HashSet<Move> {
    let allowed_shapes = canonical_shape_set(board, hand);
    let moves = generate_moves(board, &allowed_shapes, side);
    moves
        .into_iter()
        .filter(|mv| is_canonical_coord(board, mv.row as usize, mv.col as usize))
        .collect()
}

/// Restrict `hand`'s distinct shapes to the ones already on the board, plus at most one
/// representative of the shapes that aren't on the board yet (those are mutually
/// indistinguishable with respect to the rules).
///
/// Keying `unique_by` on `Some(shape)` for a shape already on the board and on `None` for
/// every unplaced shape keeps every on-board shape (each has its own distinct key) while
/// collapsing all unplaced shapes down to whichever one is encountered first.
fn canonical_shape_set(board: &Board, hand: &Hand) -> Vec<Shape> {
    let shapes_on_board: HashSet<Shape> = Shape::ALL
        .into_iter()
        .filter(|&shape| (0..4).any(|row| (0..4).any(|col| matches!(board.get(row, col), Some((s, _)) if s == shape))))
        .collect();

    hand.distinct_shapes()
        .into_iter()
        .unique_by(|&shape| shapes_on_board.contains(&shape).then_some(shape))
        .collect()
}

/// Whether `(row, col)` is in the canonical half-plane for every symmetry the board
/// currently possesses. With no active symmetries, every coordinate is canonical.
fn is_canonical_coord(board: &Board, row: usize, col: usize) -> bool {
    let symmetry = board.symmetry;
    (!symmetry.horizontal || row <= 1)
        && (!symmetry.vertical || col <= 1)
        && (!symmetry.main_diagonal || row <= col)
        && (!symmetry.anti_diagonal || row + col <= 3)
}

/// Every legal `(row, col, shape, side)` for `side`, restricted to `allowed_shapes`.
fn generate_moves(board: &Board, allowed_shapes: &[Shape], side: Side) -> HashSet<Move> {
    let mut moves = HashSet::new();
    for &shape in allowed_shapes {
        for row in 0..4 {
            for col in 0..4 {
                let mv = Move::new(row, col, shape, side);
                if board.legal(mv) {
                    moves.insert(mv);
                }
            }
        }
    }
    moves
}
