//! The game tree itself: a transposition-keyed map from [`SearchNode`] to [`ScoreRecord`].
//!
//! Positions transpose in Quantik (the same board can be reached by more than one move
//! order), so the tree is a graph rather than a strict tree: a [`SearchNode`] is looked up
//! by structural identity, and two search paths that land on the same board/move pair share
//! one record.

use std::collections::HashMap;

use crate::board::{FrozenBoard, Move};
use crate::tree::node::{ScoreRecord, SearchNode};

/// Selection priority given to any node with zero visits (or whose parent has zero visits),
/// guaranteeing it is explored before a visited sibling regardless of `uct_constant`.
const UNVISITED_PRIORITY: f64 = f64::INFINITY;

/// A merged-or-live statistics table over [`SearchNode`]s.
#[derive(Clone, Debug, Default)]
pub struct GameTree {
    nodes: HashMap<SearchNode, ScoreRecord>,
}

impl GameTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` with a zeroed record if it isn't already present. Idempotent.
    pub fn add(&mut self, node: SearchNode) {
        self.nodes.entry(node).or_default();
    }

    /// Record one more visit to `node` with the given simulation `reward`.
    pub fn update(&mut self, node: SearchNode, reward: u64) {
        let record = self.nodes.entry(node).or_default();
        record.visits += 1;
        record.reward_sum += reward;
    }

    /// The record for `node`, if it has ever been added.
    #[must_use]
    pub fn get(&self, node: &SearchNode) -> Option<&ScoreRecord> {
        self.nodes.get(node)
    }

    /// The number of visits recorded for `node`, or zero if it was never added.
    #[must_use]
    pub fn visits(&self, node: &SearchNode) -> u64 {
        self.nodes.get(node).map_or(0, |record| record.visits)
    }

    /// Whether `node` has an entry in this tree (added, but possibly still unvisited).
    #[must_use]
    pub fn contains(&self, node: &SearchNode) -> bool {
        self.nodes.contains_key(node)
    }

    /// The number of distinct nodes currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every `(node, record)` pair currently held, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&SearchNode, &ScoreRecord)> {
        self.nodes.iter()
    }

    /// Insert `node` with exactly `record`, overwriting any existing entry.
    ///
    /// Used by [`crate::tree::serde_format::load`] to restore a tree from its serialized
    /// counters verbatim, rather than replaying [`Self::update`] one visit at a time.
    pub fn insert_record(&mut self, node: SearchNode, record: ScoreRecord) {
        self.nodes.insert(node, record);
    }

    /// The UCT selection score for `node`, given its parent's current visit count and the
    /// exploration constant `uct_constant`.
    ///
    /// `node` is added to the tree if it wasn't already present. Looking up the parent's
    /// visit count is the caller's job (via [`Self::visits`] on the parent's own node) —
    /// this tree is keyed directly by node identity, so that lookup is already O(1) and no
    /// separate "graph form" counter is needed (see DESIGN.md).
    pub fn selection_score(&mut self, node: SearchNode, parent_visits: u64, uct_constant: f64) -> f64 {
        let record = self.nodes.entry(node).or_default();
        let score = if record.visits == 0 || parent_visits == 0 {
            UNVISITED_PRIORITY
        } else {
            let exploitation = record.reward_sum as f64 / record.visits as f64;
            let exploration =
                2.0 * uct_constant * ((2.0 * (parent_visits as f64).ln()) / record.visits as f64).sqrt();
            exploitation + exploration
        };
        record.selection_score = score;
        score
    }

    /// Look up (or default to a zeroed record for) the child reached from `board` by `mv`.
    fn child_record(&self, board: FrozenBoard, mv: Move) -> ScoreRecord {
        self.nodes
            .get(&SearchNode::child(board, mv))
            .copied()
            .unwrap_or_default()
    }

    /// The most-explored of `candidates` played from `board`, ties broken by reward sum.
    ///
    /// Unvisited children are ignored entirely: returns `None` if `candidates` is empty or
    /// every candidate has zero visits (e.g. against an empty or freshly-loaded-and-unqueried
    /// tree), rather than picking an arbitrary zero-visit candidate.
    #[must_use]
    pub fn best_move(&self, board: FrozenBoard, candidates: &[Move]) -> Option<Move> {
        candidates
            .iter()
            .copied()
            .filter(|&mv| self.child_record(board, mv).visits > 0)
            .max_by_key(|&mv| {
                let record = self.child_record(board, mv);
                (record.visits, record.reward_sum)
            })
    }

    /// Per-move `(visits, reward_sum)` for `board`'s `candidates`, sorted by visits
    /// descending and then reward sum descending.
    ///
    /// Sorting on reward sum as a secondary key is a deliberate refinement over the
    /// original implementation's visits-only sort, recorded as an Open Question resolution
    /// in DESIGN.md: it gives a stable, meaningful order between moves tied on visit count
    /// instead of leaving their relative order to be whatever the underlying collection
    /// happened to produce.
    #[must_use]
    pub fn move_stats(&self, board: FrozenBoard, candidates: &[Move]) -> Vec<(Move, u64, u64)> {
        let mut stats: Vec<(Move, u64, u64)> = candidates
            .iter()
            .map(|&mv| {
                let record = self.child_record(board, mv);
                (mv, record.visits, record.reward_sum)
            })
            .collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));
        stats
    }

    /// Walk the single best line from `board` for up to `max_depth` plies.
    ///
    /// `candidates_of` enumerates the legal moves from a given position (the caller supplies
    /// this so the tree module doesn't need to know about hands or sides). The walk stops
    /// early if a position has no candidates, or if none of its candidates were ever visited
    /// in this tree — continuing past an unvisited frontier would just be picking arbitrarily
    /// among zero-visit siblings, which isn't a "principal" line.
    #[must_use]
    pub fn principal_variation(
        &self,
        mut board: FrozenBoard,
        max_depth: usize,
        candidates_of: impl Fn(FrozenBoard) -> Vec<Move>,
    ) -> Vec<Move> {
        let mut line = Vec::with_capacity(max_depth);
        for _ in 0..max_depth {
            let candidates = candidates_of(board);
            let best = candidates
                .iter()
                .copied()
                .filter(|&mv| self.visits(&SearchNode::child(board, mv)) > 0)
                .max_by_key(|&mv| {
                    let record = self.child_record(board, mv);
                    (record.visits, record.reward_sum)
                });
            let Some(mv) = best else { break };
            line.push(mv);

            let mut next = board.to_board();
            if next.play(mv, false).is_err() {
                break;
            }
            board = next.freeze();
        }
        line
    }

    /// Restrict this tree to the nodes whose board has exactly `ply` occupied cells.
    ///
    /// Used to produce the pre-computed tree-slice files consumed by
    /// [`crate::tree::serde_format`]: a slice is keyed by the ply at which it applies, so
    /// only the nodes relevant to that ply are serialized.
    #[must_use]
    pub fn slice(&self, ply: usize) -> Self {
        let nodes = self
            .nodes
            .iter()
            .filter(|(node, _)| node.board.occupancy_count() == ply)
            .map(|(&node, &record)| (node, record))
            .collect();
        Self { nodes }
    }

    /// Merge several trees' statistics by summing `visits` and `reward_sum` per node.
    ///
    /// This is how independent worker trees (see §5 / `crate::mcts`) are combined for
    /// reporting once every worker's iterations have finished. The merged tree is valid for
    /// queries (`best_move`, `move_stats`, `principal_variation`) but must never be used to
    /// *continue* a search: UCT's selection score is not linear in visits and reward, so a
    /// merged score is not the score any single further iteration would have computed.
    #[must_use]
    pub fn merge(trees: &[Self]) -> Self {
        let mut merged: HashMap<SearchNode, ScoreRecord> = HashMap::new();
        for tree in trees {
            for (&node, record) in &tree.nodes {
                let entry = merged.entry(node).or_default();
                entry.visits += record.visits;
                entry.reward_sum += record.reward_sum;
            }
        }
        Self { nodes: merged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Shape, Side};

    fn mv(row: usize, col: usize) -> Move {
        Move::new(row, col, Shape::A, Side::Blue)
    }

    #[test]
    fn unvisited_node_has_infinite_selection_score() {
        let mut tree = GameTree::new();
        let node = SearchNode::child(FrozenBoard::empty(), mv(0, 0));
        assert_eq!(tree.selection_score(node, 10, 1.5), f64::INFINITY);
    }

    #[test]
    fn update_accumulates_visits_and_reward() {
        let mut tree = GameTree::new();
        let board = FrozenBoard::empty();
        let node = SearchNode::child(board, mv(0, 0));
        tree.update(node, 1);
        tree.update(node, 0);
        tree.update(node, 1);
        let record = tree.get(&node).unwrap();
        assert_eq!(record.visits, 3);
        assert_eq!(record.reward_sum, 2);
    }

    #[test]
    fn best_move_ignores_unvisited_candidates_and_returns_none_if_all_are() {
        let tree = GameTree::new();
        let board = FrozenBoard::empty();
        let a = mv(0, 0);
        let b = mv(0, 1);
        // Neither candidate was ever added, let alone visited.
        assert_eq!(tree.best_move(board, &[a, b]), None);
    }

    #[test]
    fn best_move_prefers_more_visits_then_more_reward() {
        let mut tree = GameTree::new();
        let board = FrozenBoard::empty();
        let a = mv(0, 0);
        let b = mv(0, 1);
        tree.update(SearchNode::child(board, a), 1);
        tree.update(SearchNode::child(board, a), 1);
        tree.update(SearchNode::child(board, b), 1);
        assert_eq!(tree.best_move(board, &[a, b]), Some(a));
    }

    #[test]
    fn best_move_breaks_visit_ties_by_reward_sum() {
        let mut tree = GameTree::new();
        let board = FrozenBoard::empty();
        let a = mv(0, 0);
        let b = mv(0, 1);
        tree.update(SearchNode::child(board, a), 0);
        tree.update(SearchNode::child(board, b), 1);
        assert_eq!(tree.best_move(board, &[a, b]), Some(b));
    }

    #[test]
    fn move_stats_sorts_visits_desc_then_reward_desc() {
        let mut tree = GameTree::new();
        let board = FrozenBoard::empty();
        let a = mv(0, 0);
        let b = mv(0, 1);
        let c = mv(1, 1);
        tree.update(SearchNode::child(board, a), 1);
        tree.update(SearchNode::child(board, b), 1);
        tree.update(SearchNode::child(board, b), 1);
        // c is never added: should still appear with (0, 0).
        let stats = tree.move_stats(board, &[a, b, c]);
        assert_eq!(stats[0].0, b);
        assert_eq!(stats[1].0, a);
        assert_eq!(stats[2], (c, 0, 0));
    }

    #[test]
    fn slice_keeps_only_matching_occupancy() {
        let mut tree = GameTree::new();
        let empty = FrozenBoard::empty();
        tree.add(SearchNode::root(empty));

        let mut one_piece = empty.to_board();
        one_piece.play(mv(0, 0), false).unwrap();
        tree.add(SearchNode::root(one_piece.freeze()));

        let slice0 = tree.slice(0);
        assert_eq!(slice0.len(), 1);
        assert!(slice0.contains(&SearchNode::root(empty)));

        let slice1 = tree.slice(1);
        assert_eq!(slice1.len(), 1);
        assert!(slice1.contains(&SearchNode::root(one_piece.freeze())));
    }

    #[test]
    fn merge_sums_visits_and_reward_across_trees() {
        let board = FrozenBoard::empty();
        let node = SearchNode::child(board, mv(0, 0));

        let mut first = GameTree::new();
        first.update(node, 1);
        let mut second = GameTree::new();
        second.update(node, 0);
        second.update(node, 1);

        let merged = GameTree::merge(&[first, second]);
        let record = merged.get(&node).unwrap();
        assert_eq!(record.visits, 3);
        assert_eq!(record.reward_sum, 2);
    }

    #[test]
    fn principal_variation_follows_the_most_visited_child_at_each_step() {
        let mut tree = GameTree::new();
        let root = FrozenBoard::empty();
        let first = mv(0, 0);
        tree.update(SearchNode::child(root, first), 1);

        let mut after_first = root.to_board();
        after_first.play(first, false).unwrap();
        let after_first = after_first.freeze();
        let second = Move::new(1, 1, Shape::B, Side::Red);
        tree.update(SearchNode::child(after_first, second), 1);

        let line = tree.principal_variation(root, 5, |board| {
            // Only offer the moves this test actually recorded, to keep it deterministic.
            if board == root {
                vec![first]
            } else if board == after_first {
                vec![second]
            } else {
                vec![]
            }
        });
        assert_eq!(line, vec![first, second]);
    }
}
