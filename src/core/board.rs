//! Immutable board snapshots.
//!
//! A `BoardState` is a value: every operation that "changes" the board
//! returns a new snapshot. Equality and hashing cover every cell, which is
//! what the positional superko check in `GameRecord` relies on.

use serde::{Deserialize, Serialize};

use super::group::{captured_groups_after, group_at, Group};
use super::position::{BoardSize, Position, Rotation};
use super::stone::{Color, Move, Stone};
use crate::error::{KifuError, Result};

/// An N×N grid of stones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardCells")]
pub struct BoardState {
    size: BoardSize,
    cells: Vec<Stone>,
}

/// Wire form of a board, checked through [`BoardState::from_cells`].
#[derive(Deserialize)]
struct BoardCells {
    size: BoardSize,
    cells: Vec<Stone>,
}

impl TryFrom<BoardCells> for BoardState {
    type Error = KifuError;

    fn try_from(raw: BoardCells) -> Result<Self> {
        Self::from_cells(raw.size, raw.cells)
    }
}

impl BoardState {
    /// Create an empty board.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Stone::Empty; size.cell_count()],
        }
    }

    /// Build a board from a text diagram, one string per row.
    ///
    /// `.` is empty, `X` black and `O` white; whitespace is ignored.
    ///
    /// ```
    /// use kifu_recorder::core::{BoardSize, BoardState, Position, Stone};
    ///
    /// let rows = ["X........", ".O......."];
    /// let mut full = rows.to_vec();
    /// full.resize(9, ".........");
    /// let board = BoardState::from_diagram(BoardSize::Nine, &full).unwrap();
    /// assert_eq!(board.stone_at(Position::new(0, 0)), Stone::Black);
    /// assert_eq!(board.stone_at(Position::new(1, 1)), Stone::White);
    /// ```
    pub fn from_diagram(size: BoardSize, rows: &[&str]) -> Result<Self> {
        let n = size.dimension();
        if rows.len() != n {
            return Err(KifuError::InvalidDiagram(format!(
                "expected {n} rows, got {}",
                rows.len()
            )));
        }

        let mut cells = Vec::with_capacity(size.cell_count());
        for (row, line) in rows.iter().enumerate() {
            let mut count = 0;
            for symbol in line.chars().filter(|c| !c.is_whitespace()) {
                let stone = Stone::from_symbol(symbol).ok_or_else(|| {
                    KifuError::InvalidDiagram(format!("unknown symbol {symbol:?} in row {row}"))
                })?;
                cells.push(stone);
                count += 1;
            }
            if count != n {
                return Err(KifuError::InvalidDiagram(format!(
                    "row {row} has {count} points, expected {n}"
                )));
            }
        }

        Ok(Self { size, cells })
    }

    /// Build a board from its cells in row-major order.
    pub fn from_cells(size: BoardSize, cells: Vec<Stone>) -> Result<Self> {
        if cells.len() != size.cell_count() {
            return Err(KifuError::InvalidDiagram(format!(
                "expected {} cells, got {}",
                size.cell_count(),
                cells.len()
            )));
        }
        Ok(Self { size, cells })
    }

    /// Board size.
    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Number of lines per side.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.size.dimension()
    }

    /// Stone at a position.
    ///
    /// # Panics
    ///
    /// Panics if `position` is off the board. Use [`BoardState::get`] for a
    /// checked lookup.
    #[must_use]
    pub fn stone_at(&self, position: Position) -> Stone {
        self.cells[self.size.index(position)]
    }

    /// Stone at a position, `None` when off the board.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<Stone> {
        self.size
            .contains(position)
            .then(|| self.cells[self.size.index(position)])
    }

    /// Iterate over `(position, stone)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Stone)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, &stone)| (self.size.position(index), stone))
    }

    /// Count the cells holding `stone`.
    #[must_use]
    pub fn count(&self, stone: Stone) -> usize {
        self.cells.iter().filter(|&&s| s == stone).count()
    }

    /// Check if no stones are on the board.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|s| s.is_empty())
    }

    /// New snapshot with one stone added.
    ///
    /// No captures are applied. Fails with `OccupiedPosition` if the point
    /// already holds a stone.
    pub fn with_stone(&self, position: Position, color: Color) -> Result<Self> {
        self.size.check(position)?;
        let index = self.size.index(position);
        if !self.cells[index].is_empty() {
            return Err(KifuError::OccupiedPosition(position));
        }
        let mut cells = self.cells.clone();
        cells[index] = Stone::from(color);
        Ok(Self {
            size: self.size,
            cells,
        })
    }

    /// Group containing the stone at `position`.
    pub fn group_at(&self, position: Position) -> Result<Group> {
        group_at(self, position)
    }

    /// Play a move under Go rules: place the stone, remove captured
    /// opponent groups, then reject suicide.
    ///
    /// `self` is never modified; a suicide yields `SuicideMove`.
    pub fn apply_move(&self, mv: &Move) -> Result<Self> {
        let placed = self.with_stone(mv.position, mv.color)?;
        let captured = captured_groups_after(self, mv);

        let mut cells = placed.cells;
        for group in &captured {
            for &position in group.stones() {
                cells[self.size.index(position)] = Stone::Empty;
            }
        }
        let resolved = Self {
            size: self.size,
            cells,
        };

        if resolved.group_at(mv.position)?.has_no_liberties() {
            return Err(KifuError::SuicideMove {
                position: mv.position,
                color: mv.color,
            });
        }

        Ok(resolved)
    }

    /// The single move that turns `previous` into `self`.
    ///
    /// Returns `Some` only when exactly one cell differs and that cell went
    /// from empty to a stone. Any other pattern (no change, several changes,
    /// a stone disappearing) returns `None`.
    #[must_use]
    pub fn diff_to(&self, previous: &BoardState) -> Option<Move> {
        if self.size != previous.size {
            return None;
        }

        let mut found = None;
        for (index, (&now, &before)) in self.cells.iter().zip(&previous.cells).enumerate() {
            if now == before {
                continue;
            }
            if found.is_some() || !before.is_empty() {
                return None;
            }
            found = now.color().map(|color| Move::new(self.size.position(index), color));
        }
        found
    }

    /// Like [`BoardState::diff_to`], but also accepts a board on which the
    /// stones captured by the move have already been removed.
    ///
    /// Returns `Some(mv)` iff `self == previous.with_stone(mv)` or
    /// `self == previous.apply_move(mv)`.
    #[must_use]
    pub fn move_from(&self, previous: &BoardState) -> Option<Move> {
        if self.size != previous.size {
            return None;
        }

        let mut added = None;
        let mut removed = false;
        for (index, (&now, &before)) in self.cells.iter().zip(&previous.cells).enumerate() {
            match (before, now) {
                (b, n) if b == n => {}
                (Stone::Empty, n) => {
                    if added.is_some() {
                        return None;
                    }
                    added = n.color().map(|color| Move::new(self.size.position(index), color));
                }
                (_, Stone::Empty) => removed = true,
                _ => return None,
            }
        }

        let mv = added?;
        if !removed {
            return Some(mv);
        }
        match previous.apply_move(&mv) {
            Ok(resolved) if resolved == *self => Some(mv),
            _ => None,
        }
    }

    /// Rotate the whole board a quarter turn.
    #[must_use]
    pub fn rotate(&self, rotation: Rotation) -> Self {
        let mut cells = vec![Stone::Empty; self.cells.len()];
        for (position, stone) in self.iter() {
            cells[self.size.index(rotation.apply(self.size, position))] = stone;
        }
        Self {
            size: self.size,
            cells,
        }
    }
}

impl std::fmt::Display for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.dimension()) {
            let line: String = row.iter().map(|s| s.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
