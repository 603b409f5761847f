//! Stone colours and moves.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Contents of an intersection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

impl Stone {
    /// Colour of the stone, `None` for an empty point.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Stone::Empty => None,
            Stone::Black => Some(Color::Black),
            Stone::White => Some(Color::White),
        }
    }

    /// Check if the point is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Stone::Empty)
    }

    /// Diagram character: `.` empty, `X` black, `O` white.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }

    /// Parse a diagram character.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | '+' => Some(Stone::Empty),
            'X' | 'x' | 'B' | 'b' => Some(Stone::Black),
            'O' | 'o' | 'W' | 'w' => Some(Stone::White),
            _ => None,
        }
    }
}

/// Colour of a played stone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other colour.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// SGF property name for a move of this colour.
    #[must_use]
    pub const fn sgf(self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }
}

impl From<Color> for Stone {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Stone::Black,
            Color::White => Stone::White,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// A stone placed by one player. Passes are not represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: Position,
    pub color: Color,
}

impl Move {
    /// Create a new move.
    #[must_use]
    pub const fn new(position: Position, color: Color) -> Self {
        Self { position, color }
    }

    /// SGF move node, e.g. `;B[dd]`.
    #[must_use]
    pub fn sgf(&self) -> String {
        format!(";{}[{}]", self.color.sgf(), self.position.sgf())
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.position)
    }
}
