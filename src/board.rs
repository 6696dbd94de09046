//! This module handles the board: position state, legality, win detection and the frozen
//! (hashable) snapshot used as a search-tree key.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::InvalidMoveError;
use crate::piece::{Shape, Side};

/// A coordinate on the board: `(row, column)`, both in `0..4`.
pub type Coord = (usize, usize);

/// A single cell: either empty, or occupied by a `(Shape, Side)` pair.
pub type Cell = Option<(Shape, Side)>;

/// A move: a tuple `(row, column, shape, side)`.
///
/// `row` and `col` are signed so that out-of-range input (as produced by a careless host,
/// see [`Board::check_legal`]) can be represented and rejected rather than panicking.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// The row to play in.
    pub row: i32,
    /// The column to play in.
    pub col: i32,
    /// The shape to play.
    pub shape: Shape,
    /// The side playing the move.
    pub side: Side,
}

impl Move {
    /// Build a move from an in-range coordinate. Convenience constructor for the common
    /// case where the coordinate is already known to be valid `usize`s.
    #[must_use]
    pub fn new(row: usize, col: usize, shape: Shape, side: Side) -> Self {
        Self {
            row: row as i32,
            col: col as i32,
            shape,
            side,
        }
    }
}

/// The four symmetry flags tracked incrementally on [`Board`].
///
/// Each flag records whether the board is currently invariant under the corresponding
/// reflection. The empty board is invariant under all four; playing a move can only ever
/// destroy a symmetry, never create one (see DESIGN.md), so each flag only ever flips from
/// `true` to `false`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SymmetryFlags {
    /// Invariant under `row <-> 3 - row`.
    pub(crate) horizontal: bool,
    /// Invariant under `col <-> 3 - col`.
    pub(crate) vertical: bool,
    /// Invariant under `(r, c) <-> (c, r)`.
    pub(crate) main_diagonal: bool,
    /// Invariant under `(r, c) <-> (3 - c, 3 - r)`.
    pub(crate) anti_diagonal: bool,
}

impl Default for SymmetryFlags {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: true,
            main_diagonal: true,
            anti_diagonal: true,
        }
    }
}

/// The section (2x2 sub-grid) a coordinate belongs to, as its top-left corner.
#[must_use]
pub fn section_top_left(row: usize, col: usize) -> Coord {
    (2 * (row / 2), 2 * (col / 2))
}

/// The four coordinates making up the section containing `(row, col)`.
#[must_use]
pub fn section_coords(row: usize, col: usize) -> [Coord; 4] {
    let (sr, sc) = section_top_left(row, col);
    [(sr, sc), (sr, sc + 1), (sr + 1, sc), (sr + 1, sc + 1)]
}

/// A mutable Quantik board: a mapping from occupied coordinates to `(Shape, Side)`.
///
/// Invariants upheld by construction: at most one piece per coordinate, and no row, column
/// or section ever holds two pieces of the same shape with different sides (a legal play can
/// only *complete* such a line as a win, never violate the constraint mid-game, because
/// [`Board::check_legal`] forbids opponent-shape collisions up front).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    cells: [[Cell; 4]; 4],
    pub(crate) symmetry: SymmetryFlags,
}

impl Default for Board {
    /// An empty board, invariant under all four symmetries.
    fn default() -> Self {
        Self {
            cells: [[None; 4]; 4],
            symmetry: SymmetryFlags::default(),
        }
    }
}

impl Board {
    /// Create a new, empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from a sparse map of occupied coordinates. Unlisted coordinates are
    /// empty. This is the inverse of [`Board::to_sparse`] and round-trips losslessly.
    #[must_use]
    pub fn from_sparse(sparse: &HashMap<Coord, (Shape, Side)>) -> Self {
        let mut board = Self::default();
        // Symmetry flags must be derived from the final position, not replayed move by
        // move (we have no ordering here), so recompute them from scratch once all cells
        // are in place.
        for (&(row, col), &(shape, side)) in sparse {
            board.cells[row][col] = Some((shape, side));
        }
        board.symmetry = board.compute_symmetry_from_scratch();
        board
    }

    /// Build a board from the 4x4 list-of-lists form (`None` or `Some((shape, side))` per
    /// cell). This is the inverse of [`Board::to_grid`] and round-trips losslessly.
    #[must_use]
    pub fn from_grid(grid: [[Cell; 4]; 4]) -> Self {
        let mut board = Self {
            cells: grid,
            symmetry: SymmetryFlags::default(),
        };
        board.symmetry = board.compute_symmetry_from_scratch();
        board
    }

    /// The sparse map of occupied coordinates. See [`Board::from_sparse`].
    #[must_use]
    pub fn to_sparse(&self) -> HashMap<Coord, (Shape, Side)> {
        let mut sparse = HashMap::new();
        for row in 0..4 {
            for col in 0..4 {
                if let Some(piece) = self.cells[row][col] {
                    sparse.insert((row, col), piece);
                }
            }
        }
        sparse
    }

    /// The 4x4 list-of-lists form. See [`Board::from_grid`].
    #[must_use]
    pub fn to_grid(&self) -> [[Cell; 4]; 4] {
        self.cells
    }

    /// The piece at a coordinate, if any.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// The number of pieces currently on the board.
    #[must_use]
    pub fn occupancy_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Recompute the four symmetry flags from the current cell contents, ignoring any
    /// cached state. Used when a board is constructed directly from a grid or sparse map,
    /// where we have no move history to update flags incrementally from.
    fn compute_symmetry_from_scratch(&self) -> SymmetryFlags {
        let mirrored = |f: &dyn Fn(usize, usize) -> Coord| -> bool {
            for row in 0..4 {
                for col in 0..4 {
                    let (mr, mc) = f(row, col);
                    if self.cells[row][col] != self.cells[mr][mc] {
                        return false;
                    }
                }
            }
            true
        };
        SymmetryFlags {
            horizontal: mirrored(&|r, c| (3 - r, c)),
            vertical: mirrored(&|r, c| (r, 3 - c)),
            main_diagonal: mirrored(&|r, c| (c, r)),
            anti_diagonal: mirrored(&|r, c| (3 - c, 3 - r)),
        }
    }

    /// Check whether `mv` is legal on this board, returning the specific
    /// [`InvalidMoveError`] if not.
    ///
    /// A move is legal iff: the coordinate is in range; the cell is empty; and for each of
    /// the move's row, column and section, no occupied cell already holds the same shape on
    /// the *opposite* side.
    pub fn check_legal(&self, mv: Move) -> Result<(), InvalidMoveError> {
        if mv.row < 0 || mv.row >= 4 || mv.col < 0 || mv.col >= 4 {
            return Err(InvalidMoveError::OutOfRange {
                row: mv.row,
                col: mv.col,
            });
        }
        let (row, col) = (mv.row as usize, mv.col as usize);

        if self.cells[row][col].is_some() {
            return Err(InvalidMoveError::CellOccupied(row, col));
        }

        for c in 0..4 {
            if let Some((shape, side)) = self.cells[row][c] {
                if shape == mv.shape && side != mv.side {
                    return Err(InvalidMoveError::BlockedByRow(shape));
                }
            }
        }
        for r in 0..4 {
            if let Some((shape, side)) = self.cells[r][col] {
                if shape == mv.shape && side != mv.side {
                    return Err(InvalidMoveError::BlockedByColumn(shape));
                }
            }
        }
        for (r, c) in section_coords(row, col) {
            if let Some((shape, side)) = self.cells[r][c] {
                if shape == mv.shape && side != mv.side {
                    return Err(InvalidMoveError::BlockedBySection(shape));
                }
            }
        }
        Ok(())
    }

    /// Whether `mv` is legal on this board. See [`Board::check_legal`] for the detailed
    /// error when it is not.
    #[must_use]
    pub fn legal(&self, mv: Move) -> bool {
        self.check_legal(mv).is_ok()
    }

    /// Whether `side` has any legal move at all, for any of the four shapes.
    ///
    /// Mirrors the Python original's `have_possible_move`: this checks all four shapes
    /// regardless of what `side`'s hand actually still holds, since legality by itself
    /// doesn't know about hands. Callers that care about hand depletion should check
    /// [`crate::hand::Hand::is_empty`] or intersect with [`crate::moves::exhaustive_moves`].
    #[must_use]
    pub fn has_any_legal_move(&self, side: Side) -> bool {
        for row in 0..4 {
            for col in 0..4 {
                for shape in Shape::ALL {
                    if self.legal(Move::new(row, col, shape, side)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Play `mv` onto the board, returning whether it completed a win.
    ///
    /// If `strict` is true, the move is validated first (see [`Board::check_legal`]). If
    /// `strict` is false, the caller must already know the move is legal (the move
    /// generator only ever produces legal moves) — playing an illegal move with
    /// `strict = false` is a logic error and may panic or corrupt board state.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMoveError`] (only when `strict` is true) if the move is illegal.
    pub fn play(&mut self, mv: Move, strict: bool) -> Result<bool, InvalidMoveError> {
        if strict {
            self.check_legal(mv)?;
        }
        let (row, col) = (mv.row as usize, mv.col as usize);
        self.cells[row][col] = Some((mv.shape, mv.side));
        self.update_symmetry_after_play(row, col);
        Ok(self.is_winning(row, col))
    }

    /// Update the cached symmetry flags after placing a piece at `(row, col)`.
    ///
    /// Only ever called immediately after the cell has been written. A flag that was
    /// already false stays false. A flag that was true survives iff the mirrored cell
    /// already holds an identical piece — which only happens when `(row, col)` is a fixed
    /// point of that reflection (every other case leaves the mirror cell untouched, so it
    /// can no longer match the freshly occupied cell).
    fn update_symmetry_after_play(&mut self, row: usize, col: usize) {
        let placed = self.cells[row][col];
        if self.symmetry.horizontal {
            let (mr, mc) = (3 - row, col);
            self.symmetry.horizontal = self.cells[mr][mc] == placed;
        }
        if self.symmetry.vertical {
            let (mr, mc) = (row, 3 - col);
            self.symmetry.vertical = self.cells[mr][mc] == placed;
        }
        if self.symmetry.main_diagonal {
            let (mr, mc) = (col, row);
            self.symmetry.main_diagonal = self.cells[mr][mc] == placed;
        }
        if self.symmetry.anti_diagonal {
            let (mr, mc) = (3 - col, 3 - row);
            self.symmetry.anti_diagonal = self.cells[mr][mc] == placed;
        }
    }

    /// True if the piece just placed at `(row, col)` completes its row, column or section
    /// with four distinct shapes (colors ignored).
    #[must_use]
    pub fn is_winning(&self, row: usize, col: usize) -> bool {
        let row_coords: [Coord; 4] = [(row, 0), (row, 1), (row, 2), (row, 3)];
        let col_coords: [Coord; 4] = [(0, col), (1, col), (2, col), (3, col)];
        self.line_wins(row_coords) || self.line_wins(col_coords) || self.line_wins(section_coords(row, col))
    }

    /// True iff all four coordinates are occupied by four distinct shapes.
    fn line_wins(&self, coords: [Coord; 4]) -> bool {
        let mut shapes_seen: HashSet<Shape> = HashSet::with_capacity(4);
        for (r, c) in coords {
            match self.cells[r][c] {
                None => return false,
                Some((shape, _)) => {
                    if !shapes_seen.insert(shape) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Take an immutable, order-independent snapshot suitable as a hash-map key.
    #[must_use]
    pub fn freeze(&self) -> FrozenBoard {
        FrozenBoard { cells: self.cells }
    }
}

/// An immutable, hashable snapshot of a [`Board`].
///
/// Two boards produce equal frozen snapshots iff their occupied-cell maps are equal — the
/// representation here is positional (a fixed 4x4 grid), so structural equality on the grid
/// is exactly cell-map equality; there is no insertion-order or history dependence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrozenBoard {
    cells: [[Cell; 4]; 4],
}

impl FrozenBoard {
    /// An empty frozen board.
    #[must_use]
    pub fn empty() -> Self {
        Self { cells: [[None; 4]; 4] }
    }

    /// Thaw this snapshot back into a mutable [`Board`], recomputing its symmetry cache.
    #[must_use]
    pub fn to_board(&self) -> Board {
        Board::from_grid(self.cells)
    }

    /// The piece at a coordinate, if any.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// The number of pieces on this snapshot.
    #[must_use]
    pub fn occupancy_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// The compressed wire form used by the tree-slice serialization in
    /// [`crate::tree::serde_format`]: one `(row, col, shape, side)` tuple per occupied cell.
    #[must_use]
    pub fn to_compressed(&self) -> Vec<(usize, usize, Shape, Side)> {
        let mut out = Vec::new();
        for row in 0..4 {
            for col in 0..4 {
                if let Some((shape, side)) = self.cells[row][col] {
                    out.push((row, col, shape, side));
                }
            }
        }
        out
    }

    /// Rebuild a frozen board from its compressed wire form.
    #[must_use]
    pub fn from_compressed(compressed: &[(usize, usize, Shape, Side)]) -> Self {
        let mut cells = [[None; 4]; 4];
        for &(row, col, shape, side) in compressed {
            cells[row][col] = Some((shape, side));
        }
        Self { cells }
    }
}

impl Default for FrozenBoard {
    fn default() -> Self {
        Self::empty()
    }
}
