//! Error taxonomy for the engine.
//!
//! Mirrors the teacher's `WinnerError` (a `thiserror`-derived enum colocated with the type
//! it describes), one enum per fault domain instead of a single monolithic error.

use thiserror::Error;

/// An illegal attempt to play a move onto a [`crate::board::Board`].
///
/// Raised by [`Board::play`](crate::board::Board::play) with `strict = true`, and never
/// swallowed internally.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum InvalidMoveError {
    /// The coordinate is outside the 4x4 board.
    #[error("coordinate ({row}, {col}) is out of range")]
    OutOfRange {
        /// The out-of-range row.
        row: i32,
        /// The out-of-range column.
        col: i32,
    },

    /// The target cell is already occupied.
    #[error("cell ({0}, {1}) is already occupied")]
    CellOccupied(usize, usize),

    /// An opposite-side piece of the same shape already exists in the target row.
    #[error("an opponent's {0:?} is already in that row")]
    BlockedByRow(crate::piece::Shape),

    /// An opposite-side piece of the same shape already exists in the target column.
    #[error("an opponent's {0:?} is already in that column")]
    BlockedByColumn(crate::piece::Shape),

    /// An opposite-side piece of the same shape already exists in the target section.
    #[error("an opponent's {0:?} is already in that section")]
    BlockedBySection(crate::piece::Shape),
}

/// An attempt to remove a [`Shape`](crate::piece::Shape) a [`Hand`](crate::hand::Hand) does
/// not contain.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("hand does not contain a {0:?}")]
pub struct InvalidHandError(pub crate::piece::Shape);

/// A pre-computed game-tree file was missing or malformed.
///
/// Raised by the tree-slice loader in [`crate::tree::serde_format`]. Callers at the engine
/// front door (see [`crate::engine`]) catch this specifically and fall back to a live
/// search, per §7.
#[derive(Debug, Error)]
pub enum InvalidTreeFileError {
    /// The file could not be read from disk.
    #[error("could not read tree file {path}: {source}")]
    Io {
        /// The path that could not be read.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file's contents did not parse as a tree-slice JSON array.
    #[error("malformed tree file {path}: {source}")]
    Malformed {
        /// The path that failed to parse.
        path: std::path::PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// An internal consistency assertion failed.
///
/// This indicates a bug in the engine rather than bad input; it is never expected to be
/// raised or handled by a caller.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("game tree invariant violated: {0}")]
pub struct TreeInvariantError(pub &'static str);
