//! Monte Carlo tree search with UCT selection.
//!
//! One call to [`search`] runs `config.processes` independent workers, each performing
//! `config.iterations` full playouts against its own private board/hand copies and its own
//! game tree, then merges the resulting trees for the caller to query.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Move};
use crate::hand::{Hand, HandsBySide};
use crate::moves;
use crate::piece::Side;
use crate::tree::{GameTree, SearchNode};

/// Tunable knobs for a single search. See `SPEC_FULL.md` for where each default comes from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Number of playouts per worker.
    pub iterations: u32,
    /// Whether a win's backpropagated reward is scaled by how quickly it was reached.
    ///
    /// Without this, search on the empty board routinely misses forced wins even at the
    /// default iteration count: an immediate win and a win ten plies out both backpropagate
    /// the same reward, so nothing pulls the tree toward the faster one.
    pub use_depth_reward: bool,
    /// Exploration weight `k` in the UCT formula.
    pub uct_constant: f64,
    /// Number of independent workers to fan out across.
    pub processes: usize,
    /// When true, disables canonical-mode pruning in the move generator for this search.
    pub all_possible_moves: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            use_depth_reward: true,
            uct_constant: 1.5,
            processes: 1,
            all_possible_moves: false,
        }
    }
}

/// The reward-shaping ceiling: a win found on the very next ply backpropagates this much
/// reward. The board holds at most 16 pieces, so this is also the largest number of plies a
/// game can run; the reward floor is 1, never 0, so a win is always worth something.
const ROOT_DEPTH_REWARD: u64 = 16;

/// Run a full search from `board` with `side_to_move` to move, and return the merged tree.
///
/// `current_hand` is `side_to_move`'s hand and `other_hand` is the opponent's — matching the
/// caller-facing convention used by [`crate::engine`] and [`crate::strategy`]. The returned
/// tree holds every node any worker visited, not just the root's children: `best_move` only
/// ever inspects root children, but [`GameTree::principal_variation`] and
/// [`GameTree::move_stats`] walk and query nodes deeper than the root, and a tree restricted
/// to the root ply would starve both of everything past the first move. Restricting to a
/// single ply (§4.F `slice`) is the serialization path's job, not this one's; per §5 this
/// tree must not be used to resume search.
#[must_use]
pub fn search(
    board: &Board,
    current_hand: &Hand,
    other_hand: &Hand,
    side_to_move: Side,
    config: &Config,
) -> GameTree {
    log::debug!(
        "mcts::search: ply {}, {side_to_move:?} to move, {} worker(s) x {} iterations",
        board.occupancy_count(),
        config.processes,
        config.iterations
    );

    // Workers are independent trials with no shared state (see §5), so a plain parallel map
    // over worker indices is all the fan-out needs — no pool management or scheduling beyond
    // what rayon's global thread pool already does for `par_iter`.
    let trees: Vec<GameTree> = (0..config.processes.max(1))
        .into_par_iter()
        .map(|_| run_worker(board, current_hand, other_hand, side_to_move, config))
        .collect();

    GameTree::merge(&trees)
}

/// Run `config.iterations` playouts against a private tree, board and hand copies.
fn run_worker(board: &Board, current_hand: &Hand, other_hand: &Hand, side_to_move: Side, config: &Config) -> GameTree {
    let mut tree = GameTree::new();
    // `rand::thread_rng` is seeded from the OS per thread, giving each worker independent,
    // freshly-seeded randomness without any coordination between workers (see §5).
    let mut rng = rand::thread_rng();
    for _ in 0..config.iterations {
        run_iteration(&mut tree, board, current_hand, other_hand, side_to_move, config, &mut rng);
    }
    tree
}

/// One full descend-then-backpropagate playout, per §4.G.
fn run_iteration(
    tree: &mut GameTree,
    board: &Board,
    current_hand: &Hand,
    other_hand: &Hand,
    side_to_move: Side,
    config: &Config,
    rng: &mut impl Rng,
) {
    let mut working_board = board.clone();
    let mut hands = HandsBySide::new(side_to_move, current_hand, other_hand);

    let mut side = side_to_move;
    let mut path: Vec<SearchNode> = Vec::new();

    loop {
        let frozen_before = working_board.freeze();
        let candidates: Vec<Move> = if config.all_possible_moves {
            moves::exhaustive_moves(&working_board, hands.get(side), side).into_iter().collect()
        } else {
            moves::canonical_moves(&working_board, hands.get(side), side).into_iter().collect()
        };

        // An empty candidate list means `side` has no legal move and loses; either way the
        // descent is over and `path` (whose last node was the actual winning or losing move)
        // is what backpropagation needs — which side lost doesn't change the reward
        // alternation itself, only where the loop stops.
        if candidates.is_empty() {
            break;
        }

        // The parent's visit count is the sum of its (already-materialized) children's
        // visits — this position's candidate set is deterministic, so that sum is exactly
        // how many times this position has been visited so far. No separate parent-pointer
        // counter is needed (see DESIGN.md).
        let parent_visits: u64 = candidates
            .iter()
            .map(|&mv| tree.visits(&SearchNode::child(frozen_before, mv)))
            .sum();

        let mut shuffled = candidates;
        shuffled.shuffle(rng);

        let mut best_move = shuffled[0];
        let mut best_score = f64::NEG_INFINITY;
        for &mv in &shuffled {
            let node = SearchNode::child(frozen_before, mv);
            tree.add(node);
            let score = tree.selection_score(node, parent_visits, config.uct_constant);
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
        }

        let won = working_board
            .play(best_move, false)
            .expect("a generated candidate move must be legal");
        hands
            .get_mut(side)
            .remove(best_move.shape)
            .expect("a generated candidate move must come from the side's own hand");
        path.push(SearchNode::child(frozen_before, best_move));

        if won {
            break;
        }
        side = side.other();
    }

    let depth_reward = ROOT_DEPTH_REWARD.saturating_sub(path.len() as u64).max(1);
    backpropagate(tree, &path, depth_reward, config.use_depth_reward);
}

/// Alternate reward from leaf to root: the last-appended node (the loser's final position)
/// gets the loser reward (0); the node before it gets the winner reward (1 or
/// `depth_reward`); alternating back to the root.
fn backpropagate(tree: &mut GameTree, path: &[SearchNode], depth_reward: u64, use_depth_reward: bool) {
    let winner_reward = if use_depth_reward { depth_reward } else { 1 };
    let mut reward = 0;
    for &node in path.iter().rev() {
        tree.update(node, reward);
        reward = if reward == 0 { winner_reward } else { 0 };
    }
}
