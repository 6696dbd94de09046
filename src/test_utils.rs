//! This module simply contains utilities to help with unit testing and benchmarking.

/// Build a [`Board`](crate::board::Board) from a list of `(row, col) => (shape, side)`
/// entries, going through the sparse-map constructor so every test board exercises
/// [`Board::from_sparse`](crate::board::Board::from_sparse) along the way.
#[cfg_attr(feature = "bench", macro_export)]
macro_rules! quantik_board {
    ( $( ($row:expr, $col:expr) => ($shape:expr, $side:expr) ),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut sparse = ::std::collections::HashMap::new();
        $( sparse.insert(($row, $col), ($shape, $side)); )*
        $crate::board::Board::from_sparse(&sparse)
    }};
}

/// Build a [`Hand`](crate::hand::Hand) from a list of shapes, e.g.
/// `quantik_hand![Shape::A, Shape::A, Shape::B]`.
#[cfg_attr(feature = "bench", macro_export)]
macro_rules! quantik_hand {
    ( $( $shape:expr ),* $(,)? ) => {{
        $crate::hand::Hand::from_shapes(vec![ $( $shape ),* ])
    }};
}

#[cfg(not(feature = "bench"))]
pub(crate) use quantik_board;
#[cfg(not(feature = "bench"))]
#[allow(unused_imports)]
pub(crate) use quantik_hand;

#[cfg(feature = "bench")]
pub use quantik_board;
#[cfg(feature = "bench")]
pub use quantik_hand;
