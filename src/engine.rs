//! The public front door: `best_move`, `move_stats`, and `principal_variation`.
//!
//! Each operation picks an algorithm via [`crate::strategy`], resolves an MCTS tree (a
//! pre-computed slice under `tree_dir` if one matches, else a live search), and reports
//! through it. A [`crate::error::InvalidTreeFileError`] from a missing or malformed slice
//! file is caught here and never surfaces to the caller, per §7 — it just means a live
//! search instead.

use std::path::Path;

use crate::board::{Board, Move};
use crate::hand::{Hand, HandsBySide};
use crate::mcts;
use crate::minimax;
use crate::moves;
use crate::piece::Side;
use crate::strategy::{self, Strategy};
use crate::tree::{serde_format, GameTree};

/// Canonical-mode candidates for `side` to move on `board`, with that side's hand derived
/// directly from the board (see [`Hand::remaining_on_board`]).
fn candidates_for(board: &Board, side: Side) -> Vec<Move> {
    let hand = Hand::remaining_on_board(board, side);
    moves::canonical_moves(board, &hand, side).into_iter().collect()
}

/// The side to move at `ply`, given that `root_side` was to move at `root_ply`, assuming
/// strict alternation from there on.
fn side_at_ply(root_ply: usize, root_side: Side, ply: usize) -> Side {
    if (ply - root_ply) % 2 == 0 {
        root_side
    } else {
        root_side.other()
    }
}

/// Resolve the MCTS tree for this decision: a pre-computed slice from `tree_dir` keyed by
/// (ply, side to move) if one exists and parses, else a fresh live search.
fn resolve_mcts_tree(
    board: &Board,
    current_hand: &Hand,
    other_hand: &Hand,
    side_to_move: Side,
    tree_dir: Option<&Path>,
    config: &mcts::Config,
) -> GameTree {
    if let Some(dir) = tree_dir {
        let path = dir.join(serde_format::slice_filename(board.occupancy_count(), side_to_move));
        match serde_format::load(&path) {
            Ok(tree) => {
                log::debug!("loaded pre-computed tree slice from {}", path.display());
                return tree;
            }
            Err(err) => log::debug!("no usable tree slice at {}: {err}; falling back to live search", path.display()),
        }
    }
    mcts::search(board, current_hand, other_hand, side_to_move, config)
}

/// The move this engine would play from `board`, or `None` if `side_to_move` has no legal
/// move (a loss, not an error — see §6).
#[must_use]
pub fn best_move(
    board: &Board,
    current_hand: &Hand,
    other_hand: &Hand,
    side_to_move: Side,
    tree_dir: Option<&Path>,
) -> Option<Move> {
    let strategy = strategy::select(board, current_hand, other_hand);
    log::debug!("engine::best_move: ply {}, strategy {strategy:?}", board.occupancy_count());

    match strategy {
        Strategy::Minimax => {
            let hands = HandsBySide::new(side_to_move, current_hand, other_hand);
            minimax::decide(board, &hands, side_to_move, side_to_move).best_move
        }
        Strategy::Mcts => {
            let config = mcts::Config::default();
            let tree = resolve_mcts_tree(board, current_hand, other_hand, side_to_move, tree_dir, &config);
            let candidates = candidates_for(board, side_to_move);
            tree.best_move(board.freeze(), &candidates)
        }
    }
}

/// The principal variation from `board`: iteratively play the tree's `best_move` and
/// re-enter, up to `depth` plies or until a position has no visited children.
#[must_use]
pub fn principal_variation(
    board: &Board,
    current_hand: &Hand,
    other_hand: &Hand,
    side_to_move: Side,
    depth: usize,
    tree_dir: Option<&Path>,
) -> Vec<Move> {
    let config = mcts::Config::default();
    let tree = resolve_mcts_tree(board, current_hand, other_hand, side_to_move, tree_dir, &config);
    let root_ply = board.occupancy_count();

    tree.principal_variation(board.freeze(), depth, move |frozen| {
        let side = side_at_ply(root_ply, side_to_move, frozen.occupancy_count());
        candidates_for(&frozen.to_board(), side)
    })
}

/// Per-move `(visits, reward_sum)` for the position at the end of the principal variation of
/// length `depth` from `board`, sorted visits descending then reward_sum descending.
#[must_use]
pub fn move_stats(
    board: &Board,
    current_hand: &Hand,
    other_hand: &Hand,
    side_to_move: Side,
    depth: usize,
    tree_dir: Option<&Path>,
) -> Vec<(Move, u64, u64)> {
    let config = mcts::Config::default();
    let tree = resolve_mcts_tree(board, current_hand, other_hand, side_to_move, tree_dir, &config);
    let root_ply = board.occupancy_count();

    let line = tree.principal_variation(board.freeze(), depth, move |frozen| {
        let side = side_at_ply(root_ply, side_to_move, frozen.occupancy_count());
        candidates_for(&frozen.to_board(), side)
    });

    let mut end_board = board.clone();
    for &mv in &line {
        end_board.play(mv, false).expect("a principal variation move must be legal");
    }
    let end_side = side_at_ply(root_ply, side_to_move, end_board.occupancy_count());
    let candidates = candidates_for(&end_board, end_side);
    tree.move_stats(end_board.freeze(), &candidates)
}
