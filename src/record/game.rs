//! Game record: the validated history of a recorded game.
//!
//! ## History
//!
//! `boards[0]` is the empty board and `moves[i]` turns `boards[i]` into
//! `boards[i + 1]`. The history grows by one validated candidate at a time,
//! shrinks only through undo, and is rebuilt wholesale by rotation.
//!
//! ## Captures
//!
//! Candidates coming from the classifier contain only the newly added
//! stone. Validation resolves captures on the candidate before the superko
//! check, so the stored boards always reflect the position after captures.
//! Candidates on which the captured stones are already gone are accepted
//! as well.
//!
//! ## Counters
//!
//! `undo_count` and `manual_add_count` only measure recognition accuracy;
//! rule logic never reads them.

use chrono::NaiveDate;
use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sgf;
use crate::core::{BoardSize, BoardState, Color, Diagnostics, Move, Rotation};
use crate::error::{KifuError, Result};

/// Application name and version written to the SGF `AP` property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    pub version: String,
}

impl Default for Application {
    fn default() -> Self {
        Self {
            name: "Kifu Recorder".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Why a candidate board was not added to the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The candidate is not the last board plus exactly one stone.
    NotASingleMove,
    /// The new stone would have no liberties after captures.
    Suicide,
    /// The resulting position already occurred in this game.
    Superko,
    /// It is not this colour's turn.
    OutOfTurn(Color),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NotASingleMove => write!(f, "not a single added stone"),
            Rejection::Suicide => write!(f, "suicide"),
            Rejection::Superko => write!(f, "repeats an earlier position"),
            Rejection::OutOfTurn(color) => write!(f, "{color} cannot play now"),
        }
    }
}

/// A recorded game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRecord {
    size: BoardSize,
    black_player: String,
    white_player: String,
    komi: String,
    application: Application,

    /// Board after each move, starting with the empty board.
    boards: Vector<BoardState>,

    /// Moves in play order; one fewer than `boards`.
    moves: Vector<Move>,

    undo_count: u32,
    manual_add_count: u32,

    #[serde(skip)]
    diagnostics: Diagnostics,
}

impl GameRecord {
    /// Create a record for a new game.
    #[must_use]
    pub fn new(
        size: BoardSize,
        black_player: impl Into<String>,
        white_player: impl Into<String>,
        komi: impl Into<String>,
    ) -> Self {
        Self {
            size,
            black_player: black_player.into(),
            white_player: white_player.into(),
            komi: komi.into(),
            application: Application::default(),
            boards: Vector::unit(BoardState::new(size)),
            moves: Vector::new(),
            undo_count: 0,
            manual_add_count: 0,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Set the application written to the SGF header.
    #[must_use]
    pub fn with_application(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.application = Application {
            name: name.into(),
            version: version.into(),
        };
        self
    }

    /// Set the diagnostics for this record.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Replace the diagnostics (e.g. after restoring a snapshot).
    pub fn set_diagnostics(&mut self, diagnostics: Diagnostics) {
        self.diagnostics = diagnostics;
    }

    // === Accessors ===

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

    #[must_use]
    pub fn black_player(&self) -> &str {
        &self.black_player
    }

    #[must_use]
    pub fn white_player(&self) -> &str {
        &self.white_player
    }

    #[must_use]
    pub fn komi(&self) -> &str {
        &self.komi
    }

    #[must_use]
    pub fn application(&self) -> &Application {
        &self.application
    }

    /// All boards, starting with the empty board.
    #[must_use]
    pub fn boards(&self) -> &Vector<BoardState> {
        &self.boards
    }

    /// All moves in play order.
    #[must_use]
    pub fn moves(&self) -> &Vector<Move> {
        &self.moves
    }

    /// Number of moves played.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Number of boards (moves + 1).
    #[must_use]
    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    /// The current position.
    #[must_use]
    pub fn last_board(&self) -> &BoardState {
        &self.boards[self.boards.len() - 1]
    }

    /// The most recent move, if any.
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    /// Times a move was undone.
    #[must_use]
    pub fn undo_count(&self) -> u32 {
        self.undo_count
    }

    /// Times a move had to be entered by hand.
    #[must_use]
    pub fn manual_add_count(&self) -> u32 {
        self.manual_add_count
    }

    // === Legality ===

    /// Check if `color` may play next.
    ///
    /// Black may play on an empty record, while only black stones have been
    /// placed (handicap stones), or after white. White may play only after
    /// black.
    #[must_use]
    pub fn can_play(&self, color: Color) -> bool {
        match color {
            Color::Black => {
                self.moves.is_empty()
                    || self.moves.iter().all(|mv| mv.color == Color::Black)
                    || self.last_move().map(|mv| mv.color) == Some(Color::White)
            }
            Color::White => self.last_move().map(|mv| mv.color) == Some(Color::Black),
        }
    }

    /// Check a candidate board without changing the record.
    ///
    /// On success returns the move and the board after captures.
    pub fn validate(
        &self,
        candidate: &BoardState,
    ) -> std::result::Result<(Move, BoardState), Rejection> {
        let last = self.last_board();
        let mv = candidate.move_from(last).ok_or(Rejection::NotASingleMove)?;
        let resolved = match last.apply_move(&mv) {
            Ok(board) => board,
            Err(KifuError::SuicideMove { .. }) => return Err(Rejection::Suicide),
            Err(_) => return Err(Rejection::NotASingleMove),
        };

        if self.boards.iter().any(|board| *board == resolved) {
            return Err(Rejection::Superko);
        }
        if !self.can_play(mv.color) {
            return Err(Rejection::OutOfTurn(mv.color));
        }

        Ok((mv, resolved))
    }

    // === Mutation ===

    /// Append the candidate if it is a legal next position.
    ///
    /// Returns the accepted move, or why the candidate was rejected. The
    /// record is unchanged on rejection.
    pub fn try_add_move(&mut self, candidate: &BoardState) -> std::result::Result<Move, Rejection> {
        match self.validate(candidate) {
            Ok((mv, resolved)) => {
                self.boards.push_back(resolved);
                self.moves.push_back(mv);
                debug!(mv = %mv, moves = self.moves.len(), "accepted move");
                Ok(mv)
            }
            Err(rejection) => {
                if self.diagnostics.move_validation {
                    debug!(
                        reason = %rejection,
                        moves = self.moves.len(),
                        "rejected candidate board"
                    );
                }
                Err(rejection)
            }
        }
    }

    /// Append the candidate if it is a legal next position.
    ///
    /// Rejections are expected during continuous frame sampling and are not
    /// errors.
    pub fn add_move_if_valid(&mut self, candidate: &BoardState) -> bool {
        self.try_add_move(candidate).is_ok()
    }

    /// Add a move the user entered by hand and count it.
    pub fn add_move_manually(&mut self, candidate: &BoardState) -> bool {
        let added = self.add_move_if_valid(candidate);
        if added {
            self.note_manual_addition();
        }
        added
    }

    /// Count a move that had to be entered by hand outside this record.
    pub fn note_manual_addition(&mut self) {
        self.manual_add_count += 1;
    }

    /// Drop the last move and its board.
    ///
    /// Returns the undone move, or `None` (and changes nothing) if no moves
    /// were played.
    pub fn undo_last_move(&mut self) -> Option<Move> {
        let mv = self.moves.pop_back()?;
        self.boards.pop_back();
        self.undo_count += 1;
        debug!(mv = %mv, moves = self.moves.len(), "undid move");
        Some(mv)
    }

    /// Rotate the whole history a quarter turn.
    ///
    /// Every board is rotated and the moves are recomputed from consecutive
    /// boards, so the history stays self-consistent. A history that fails
    /// [`check_consistency`](Self::check_consistency) is left unchanged.
    pub fn rotate(&mut self, rotation: Rotation) {
        let boards: Vector<BoardState> = self.boards.iter().map(|b| b.rotate(rotation)).collect();

        let moves: Option<Vector<Move>> = boards
            .iter()
            .zip(boards.iter().skip(1))
            .map(|(before, after)| after.move_from(before))
            .collect();
        debug_assert!(moves.is_some(), "rotated history has a board pair with no move");
        let Some(moves) = moves else {
            return;
        };

        self.boards = boards;
        self.moves = moves;
        debug!(direction = rotation.direction(), moves = self.moves.len(), "rotated record");
    }

    // === Export ===

    /// SGF text of the game, dated today.
    #[must_use]
    pub fn to_sgf(&self) -> String {
        self.to_sgf_dated(chrono::Local::now().date_naive())
    }

    /// SGF text of the game with an explicit `DT` date.
    #[must_use]
    pub fn to_sgf_dated(&self, date: NaiveDate) -> String {
        sgf::write_game(self, date)
    }

    /// Check the history invariants (used when restoring snapshots).
    pub fn check_consistency(&self) -> Result<()> {
        let invalid = |reason: String| Err(KifuError::Snapshot(reason));

        if self.boards.len() != self.moves.len() + 1 {
            return invalid(format!(
                "{} boards for {} moves",
                self.boards.len(),
                self.moves.len()
            ));
        }
        if !self.boards[0].is_empty() {
            return invalid("first board is not empty".to_string());
        }
        for (i, board) in self.boards.iter().enumerate() {
            if board.size() != self.size {
                return invalid(format!("board {i} is {} on a {} record", board.size(), self.size));
            }
        }
        for (i, mv) in self.moves.iter().enumerate() {
            if self.boards[i + 1].move_from(&self.boards[i]) != Some(*mv) {
                return invalid(format!("move {i} ({mv}) does not match its boards"));
            }
        }
        Ok(())
    }
}
