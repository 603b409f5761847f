//! Connected groups and their liberties.
//!
//! Groups are derived data: they are recomputed from a `BoardState` on every
//! query and never updated in place.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHashSet;

use super::board::BoardState;
use super::position::Position;
use super::stone::{Color, Move, Stone};
use crate::error::{KifuError, Result};

/// A maximal 4-connected set of same-coloured stones plus its liberties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    color: Color,
    stones: FxHashSet<Position>,
    liberties: FxHashSet<Position>,
}

impl Group {
    /// Colour of the group's stones.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Positions of the group's stones.
    #[must_use]
    pub fn stones(&self) -> &FxHashSet<Position> {
        &self.stones
    }

    /// Empty points adjacent to the group.
    #[must_use]
    pub fn liberties(&self) -> &FxHashSet<Position> {
        &self.liberties
    }

    /// Number of stones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stones.len()
    }

    /// Groups always hold at least one stone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    /// Check if the group contains a stone at `position`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.stones.contains(&position)
    }

    /// Exactly one liberty left.
    #[must_use]
    pub fn in_atari(&self) -> bool {
        self.liberties.len() == 1
    }

    /// No liberties left.
    #[must_use]
    pub fn has_no_liberties(&self) -> bool {
        self.liberties.is_empty()
    }

    /// Check if playing `mv` takes this group's last liberty.
    #[must_use]
    pub fn is_captured_by(&self, mv: &Move) -> bool {
        mv.color != self.color && self.in_atari() && self.liberties.contains(&mv.position)
    }

    fn sorted(set: &FxHashSet<Position>) -> Vec<Position> {
        let mut out: Vec<_> = set.iter().copied().collect();
        out.sort_unstable();
        out
    }
}

impl Hash for Group {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.color.hash(state);
        Self::sorted(&self.stones).hash(state);
        Self::sorted(&self.liberties).hash(state);
    }
}

/// Flood-fill the group containing `position`.
///
/// Fails with `EmptyPosition` when the point holds no stone.
pub fn group_at(board: &BoardState, position: Position) -> Result<Group> {
    let size = board.size();
    size.check(position)?;
    let color = board
        .stone_at(position)
        .color()
        .ok_or(KifuError::EmptyPosition(position))?;
    let stone = Stone::from(color);

    let mut stones = FxHashSet::default();
    let mut liberties = FxHashSet::default();
    let mut frontier = vec![position];
    stones.insert(position);

    while let Some(current) = frontier.pop() {
        for neighbor in size.neighbors(current) {
            let there = board.stone_at(neighbor);
            if there == stone {
                if stones.insert(neighbor) {
                    frontier.push(neighbor);
                }
            } else if there.is_empty() {
                liberties.insert(neighbor);
            }
        }
    }

    Ok(Group {
        color,
        stones,
        liberties,
    })
}

/// Opponent groups that lose their last liberty when `mv` is played.
///
/// `board` is the position before the move; `mv.position` must be empty on it.
pub fn captured_groups_after(board: &BoardState, mv: &Move) -> Vec<Group> {
    let size = board.size();
    let opponent = Stone::from(mv.color.opponent());
    let mut captured: Vec<Group> = Vec::new();

    for neighbor in size.neighbors(mv.position) {
        if board.stone_at(neighbor) != opponent {
            continue;
        }
        if captured.iter().any(|group| group.contains(neighbor)) {
            continue;
        }
        // Occupied by construction, so the lookup cannot fail
        if let Ok(group) = group_at(board, neighbor) {
            if group.is_captured_by(mv) {
                captured.push(group);
            }
        }
    }

    captured
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BoardSize;

    fn board(rows: &[&str]) -> BoardState {
        BoardState::from_diagram(BoardSize::Nine, rows).unwrap()
    }

    #[test]
    fn test_single_stone_liberties() {
        let b = board(&[
            ".........",
            ".........",
            "....X....",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        let group = group_at(&b, Position::new(2, 4)).unwrap();

        assert_eq!(group.color(), Color::Black);
        assert_eq!(group.len(), 1);
        assert_eq!(group.liberties().len(), 4);
        assert!(!group.in_atari());
        assert!(!group.has_no_liberties());
    }

    #[test]
    fn test_connected_group() {
        let b = board(&[
            "XX.......",
            "XO.......",
            "O........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        let group = group_at(&b, Position::new(0, 0)).unwrap();

        assert_eq!(group.len(), 3);
        assert!(group.contains(Position::new(0, 1)));
        assert!(group.contains(Position::new(1, 0)));
        // Only (0, 2) is free around the black group
        assert!(group.in_atari());
        assert!(group.liberties().contains(&Position::new(0, 2)));
    }

    #[test]
    fn test_group_at_empty_point() {
        let b = BoardState::new(BoardSize::Nine);
        assert!(matches!(
            group_at(&b, Position::new(3, 3)),
            Err(KifuError::EmptyPosition(_))
        ));
    }

    #[test]
    fn test_group_equality_is_structural() {
        let b = board(&[
            "XX.......",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        let from_left = group_at(&b, Position::new(0, 0)).unwrap();
        let from_right = group_at(&b, Position::new(0, 1)).unwrap();
        assert_eq!(from_left, from_right);

        let mut set = FxHashSet::default();
        set.insert(from_left);
        set.insert(from_right);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_captured_groups_after() {
        let b = board(&[
            ".XO......",
            "XO.......",
            ".X.......",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        // White (1, 1) has a single liberty at (1, 2)
        let mv = Move::new(Position::new(1, 2), Color::Black);
        let captured = captured_groups_after(&b, &mv);

        assert_eq!(captured.len(), 1);
        assert!(captured[0].contains(Position::new(1, 1)));
        assert_eq!(captured[0].color(), Color::White);
    }

    #[test]
    fn test_captured_group_counted_once() {
        let b = board(&[
            "XOOX.....",
            "XO.X.....",
            ".XX......",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        // (1, 2) touches the white group twice
        let mv = Move::new(Position::new(1, 2), Color::Black);
        let captured = captured_groups_after(&b, &mv);

        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].len(), 3);
    }

    #[test]
    fn test_no_capture_of_own_color() {
        let b = board(&[
            ".X.......",
            "X........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        let mv = Move::new(Position::new(0, 0), Color::Black);
        assert!(captured_groups_after(&b, &mv).is_empty());
    }
}
