//! Board coordinates.
//!
//! ## Position
//!
//! Zero-based `(row, col)` intersection. Row 0 is the top edge of the
//! rectified board image, col 0 its left edge.
//!
//! ## BoardSize
//!
//! The three supported board dimensions. Owns the geometry helpers
//! (indexing, neighbours, iteration) so a `Position` never needs to know
//! which board it belongs to.
//!
//! ## Rotation
//!
//! Quarter-turn direction used when the camera was set up at a different
//! side of the board than the record assumes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{KifuError, Result};

/// A board intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// SGF coordinate pair: column letter then row letter, `a` = 0.
    ///
    /// ```
    /// use kifu_recorder::core::Position;
    ///
    /// assert_eq!(Position::new(0, 0).sgf(), "aa");
    /// assert_eq!(Position::new(3, 15).sgf(), "pd");
    /// ```
    ///
    /// Off-board coordinates map past `z` instead of wrapping.
    #[must_use]
    pub fn sgf(self) -> String {
        [self.col, self.row].into_iter().map(sgf_letter).collect()
    }
}

fn sgf_letter(coordinate: u8) -> char {
    char::from_u32(u32::from(b'a') + u32::from(coordinate)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Supported board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardSize {
    Nine,
    Thirteen,
    Nineteen,
}

impl BoardSize {
    /// Board size from its dimension (9, 13 or 19).
    pub fn new(dimension: usize) -> Result<Self> {
        match dimension {
            9 => Ok(Self::Nine),
            13 => Ok(Self::Thirteen),
            19 => Ok(Self::Nineteen),
            other => Err(KifuError::UnsupportedBoardSize(other)),
        }
    }

    /// Number of lines per side.
    #[must_use]
    pub const fn dimension(self) -> usize {
        match self {
            Self::Nine => 9,
            Self::Thirteen => 13,
            Self::Nineteen => 19,
        }
    }

    /// Number of intersections.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.dimension() * self.dimension()
    }

    /// Check if a position lies on this board.
    #[must_use]
    pub const fn contains(self, position: Position) -> bool {
        (position.row as usize) < self.dimension() && (position.col as usize) < self.dimension()
    }

    /// Check a position against this board.
    pub fn check(self, position: Position) -> Result<Position> {
        if self.contains(position) {
            Ok(position)
        } else {
            Err(KifuError::OutOfBounds {
                position,
                dimension: self.dimension(),
            })
        }
    }

    /// Row-major cell index. The position must be on the board.
    #[inline]
    #[must_use]
    pub const fn index(self, position: Position) -> usize {
        position.row as usize * self.dimension() + position.col as usize
    }

    /// Position for a row-major cell index.
    #[inline]
    #[must_use]
    pub const fn position(self, index: usize) -> Position {
        Position::new(
            (index / self.dimension()) as u8,
            (index % self.dimension()) as u8,
        )
    }

    /// Iterate over all positions in row-major order.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.cell_count()).map(move |index| self.position(index))
    }

    /// Orthogonal neighbours in up, right, down, left order.
    #[must_use]
    pub fn neighbors(self, position: Position) -> SmallVec<[Position; 4]> {
        let last = (self.dimension() - 1) as u8;
        let mut out = SmallVec::new();
        if position.row > 0 {
            out.push(Position::new(position.row - 1, position.col));
        }
        if position.col < last {
            out.push(Position::new(position.row, position.col + 1));
        }
        if position.row < last {
            out.push(Position::new(position.row + 1, position.col));
        }
        if position.col > 0 {
            out.push(Position::new(position.row, position.col - 1));
        }
        out
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = KifuError;

    fn try_from(dimension: usize) -> Result<Self> {
        Self::new(dimension)
    }
}

impl std::fmt::Display for BoardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}x{0}", self.dimension())
    }
}

/// Quarter-turn direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// Rotation from a signed direction: `1` clockwise, `-1` counter-clockwise.
    ///
    /// Any other value is not a rotation.
    #[must_use]
    pub const fn from_direction(direction: i32) -> Option<Self> {
        match direction {
            1 => Some(Self::Clockwise),
            -1 => Some(Self::CounterClockwise),
            _ => None,
        }
    }

    /// Signed direction of this rotation.
    #[must_use]
    pub const fn direction(self) -> i32 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }

    /// The opposite rotation.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    /// Where `position` lands after rotating a board of `size`.
    #[must_use]
    pub const fn apply(self, size: BoardSize, position: Position) -> Position {
        let last = (size.dimension() - 1) as u8;
        match self {
            Self::Clockwise => Position::new(position.col, last - position.row),
            Self::CounterClockwise => Position::new(last - position.col, position.row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_size_new() {
        assert_eq!(BoardSize::new(9).unwrap(), BoardSize::Nine);
        assert_eq!(BoardSize::new(13).unwrap(), BoardSize::Thirteen);
        assert_eq!(BoardSize::new(19).unwrap(), BoardSize::Nineteen);
        assert!(matches!(
            BoardSize::new(15),
            Err(KifuError::UnsupportedBoardSize(15))
        ));
    }

    #[test]
    fn test_index_round_trip() {
        let size = BoardSize::Thirteen;
        for (index, position) in size.positions().enumerate() {
            assert_eq!(size.index(position), index);
        }
        assert_eq!(size.positions().count(), 169);
    }

    #[test]
    fn test_neighbors() {
        let size = BoardSize::Nine;

        let corner = size.neighbors(Position::new(0, 0));
        assert_eq!(corner.as_slice(), &[Position::new(0, 1), Position::new(1, 0)]);

        let edge = size.neighbors(Position::new(8, 4));
        assert_eq!(edge.len(), 3);

        let center = size.neighbors(Position::new(4, 4));
        assert_eq!(
            center.as_slice(),
            &[
                Position::new(3, 4),
                Position::new(4, 5),
                Position::new(5, 4),
                Position::new(4, 3),
            ]
        );
    }

    #[test]
    fn test_check_out_of_bounds() {
        assert!(BoardSize::Nine.check(Position::new(8, 8)).is_ok());
        assert!(matches!(
            BoardSize::Nine.check(Position::new(9, 0)),
            Err(KifuError::OutOfBounds { dimension: 9, .. })
        ));
    }

    #[test]
    fn test_rotation_from_direction() {
        assert_eq!(Rotation::from_direction(1), Some(Rotation::Clockwise));
        assert_eq!(Rotation::from_direction(-1), Some(Rotation::CounterClockwise));
        assert_eq!(Rotation::from_direction(0), None);
        assert_eq!(Rotation::from_direction(2), None);
    }

    #[test]
    fn test_rotation_apply() {
        let size = BoardSize::Nine;
        // Top-left corner goes to top-right under a clockwise turn
        assert_eq!(
            Rotation::Clockwise.apply(size, Position::new(0, 0)),
            Position::new(0, 8)
        );
        assert_eq!(
            Rotation::CounterClockwise.apply(size, Position::new(0, 0)),
            Position::new(8, 0)
        );

        let p = Position::new(2, 7);
        let there = Rotation::Clockwise.apply(size, p);
        assert_eq!(Rotation::CounterClockwise.apply(size, there), p);
    }

    #[test]
    fn test_sgf_coordinates() {
        assert_eq!(Position::new(0, 2).sgf(), "ca");
        assert_eq!(Position::new(18, 18).sgf(), "ss");
    }

    #[test]
    fn test_sgf_coordinates_off_board() {
        assert_eq!(Position::new(0, 26).sgf(), "{a");
        assert_eq!(Position::new(u8::MAX, u8::MAX).sgf().chars().count(), 2);
    }

    #[test]
    fn test_position_serialization() {
        let position = Position::new(3, 4);
        let json = serde_json::to_string(&position).unwrap();
        let deserialized: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(position, deserialized);
    }
}
