//! This module handles the shape and side model shared by every other module.

use serde::{Deserialize, Serialize};

/// One of the four distinct pawn shapes a Quantik piece can have.
///
/// Shapes are equal and hashable, and order is never meaningful to the rules — only
/// identity matters. [`Shape::ALL`] fixes an arbitrary but stable enumeration order, used
/// wherever the engine needs a deterministic "pick one representative" choice (see
/// [`crate::moves`]).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Shape {
    A,
    B,
    C,
    D,
}

impl Shape {
    /// All four shapes, in a fixed, stable order.
    pub const ALL: [Shape; 4] = [Shape::A, Shape::B, Shape::C, Shape::D];
}

/// One of the two sides playing a game of Quantik.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    /// Return the opposing side.
    #[must_use]
    pub fn other(&self) -> Self {
        match self {
            Self::Blue => Self::Red,
            Self::Red => Self::Blue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_is_an_involution() {
        for side in [Side::Blue, Side::Red] {
            assert_eq!(side.other().other(), side);
            assert_ne!(side.other(), side);
        }
    }

    #[test]
    fn all_shapes_are_distinct() {
        let all = Shape::ALL;
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }
}
