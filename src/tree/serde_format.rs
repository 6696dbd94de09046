//! On-disk format for pre-computed tree slices.
//!
//! A slice is a JSON array of records, one per node, each pairing a compressed node identity
//! with its visit/reward counters:
//!
//! ```json
//! [
//!   {"node": [[[0, 0, "A", "Blue"]], null], "montecarlo": [12, 7]},
//!   {"node": [[[0, 0, "A", "Blue"]], [0, 1, "B", "Red"]], "montecarlo": [5, 2]}
//! ]
//! ```
//!
//! Files are named `{ply}_{side}.json` (e.g. `3_Red.json`) and hold the slice for positions
//! at that ply about to be played by that side — see [`crate::engine`] for how these are
//! looked up and loaded.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{FrozenBoard, Move};
use crate::error::InvalidTreeFileError;
use crate::piece::Side;
use crate::tree::node::{ScoreRecord, SearchNode};
use crate::tree::store::GameTree;

/// The wire form of a [`Move`]: `(row, col, shape, side)`, matching §6's `[row, col,
/// shape-name, side-name]` array rather than `Move`'s own named-field struct layout (which
/// `serde` would otherwise render as a JSON object, not the array the format mandates).
type CompressedMove = (i32, i32, crate::piece::Shape, Side);

/// One node's compressed identity: the board it's played from, and the move played (or
/// `None` for a root record).
type CompressedNode = (Vec<(usize, usize, crate::piece::Shape, Side)>, Option<CompressedMove>);

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    node: CompressedNode,
    montecarlo: (u64, u64),
}

/// The filename a tree slice for `(ply, side)` is expected under, relative to a tree
/// directory.
#[must_use]
pub fn slice_filename(ply: usize, side: Side) -> String {
    format!("{ply}_{side:?}.json")
}

/// Serialize `tree` to the JSON slice format.
///
/// # Errors
///
/// Returns [`InvalidTreeFileError::Io`] if `path` cannot be written.
pub fn save(tree: &GameTree, path: &Path) -> Result<(), InvalidTreeFileError> {
    let records: Vec<Record> = tree
        .iter()
        .map(|(node, record)| Record {
            node: (
                node.board.to_compressed(),
                node.mv.map(|mv| (mv.row, mv.col, mv.shape, mv.side)),
            ),
            montecarlo: (record.visits, record.reward_sum),
        })
        .collect();

    let file = std::fs::File::create(path).map_err(|source| InvalidTreeFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer(file, &records).map_err(|source| InvalidTreeFileError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a tree slice from `path`.
///
/// # Errors
///
/// Returns [`InvalidTreeFileError::Io`] if `path` cannot be read, or
/// [`InvalidTreeFileError::Malformed`] if its contents do not parse as a tree-slice array.
/// Per §7, callers at the engine front door catch this and fall back to a live search rather
/// than propagating it further.
pub fn load(path: &Path) -> Result<GameTree, InvalidTreeFileError> {
    let bytes = std::fs::read(path).map_err(|source| InvalidTreeFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Record> =
        serde_json::from_slice(&bytes).map_err(|source| InvalidTreeFileError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let mut tree = GameTree::new();
    for record in records {
        let (compressed_board, mv) = record.node;
        let board = FrozenBoard::from_compressed(&compressed_board);
        let node = match mv {
            Some((row, col, shape, side)) => SearchNode::child(board, Move { row, col, shape, side }),
            None => SearchNode::root(board),
        };
        let (visits, reward_sum) = record.montecarlo;
        tree.insert_record(node, ScoreRecord { visits, reward_sum, selection_score: 0.0 });
    }
    Ok(tree)
}
