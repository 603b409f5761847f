//! Stone classifier integration tests.
//!
//! Frames are rendered with `BoardRenderer`, so every test is deterministic
//! and needs no camera fixtures.

use kifu_recorder::core::{BoardSize, BoardState, Color, Diagnostics, Position, Stone};
use kifu_recorder::detect::{
    BoardRenderer, ClassifierConfig, MoveHypothesis, Phase, StoneClassifier,
};
use kifu_recorder::record::GameRecord;

fn board(size: BoardSize, stones: &[(u8, u8, Color)]) -> BoardState {
    stones.iter().fold(BoardState::new(size), |b, &(row, col, color)| {
        b.with_stone(Position::new(row, col), color).unwrap()
    })
}

fn frame_with(
    last: &BoardState,
    row: u8,
    col: u8,
    color: Color,
    seed: u64,
) -> kifu_recorder::BoardImage {
    let next = last.with_stone(Position::new(row, col), color).unwrap();
    BoardRenderer::new(seed).render(&next)
}

fn assert_hypothesis(
    found: Option<MoveHypothesis>,
    row: u8,
    col: u8,
    color: Color,
    confidence: f64,
) {
    let h = found.expect("expected a move");
    assert_eq!(h.position, Position::new(row, col));
    assert_eq!(h.color, color);
    assert!((h.confidence - confidence).abs() < 1e-9, "confidence {}", h.confidence);
}

// =============================================================================
// Differential detection by phase
// =============================================================================

#[test]
fn test_first_black_stone() {
    let classifier = StoneClassifier::default();
    let last = BoardState::new(BoardSize::Nine);
    let frame = frame_with(&last, 2, 2, Color::Black, 1);

    assert_hypothesis(classifier.best_move(&last, &frame, true, false), 2, 2, Color::Black, 1.0);

    let next = classifier.classify(&last, &frame, true, false).unwrap();
    assert_eq!(next.stone_at(Position::new(2, 2)), Stone::Black);
    assert_eq!(next.count(Stone::Black), 1);
}

#[test]
fn test_empty_frame_has_no_move() {
    let classifier = StoneClassifier::default();
    let last = BoardState::new(BoardSize::Nine);
    let frame = BoardRenderer::new(4).render(&last);

    assert!(classifier.hypotheses(&last, &frame).is_empty());
    assert_eq!(classifier.classify(&last, &frame, true, true).unwrap(), last);
}

#[test]
fn test_first_white_stone_from_contrast() {
    let classifier = StoneClassifier::default();
    let last = board(BoardSize::Nine, &[(2, 2, Color::Black)]);
    let frame = frame_with(&last, 5, 5, Color::White, 2);

    assert_hypothesis(classifier.best_move(&last, &frame, true, true), 5, 5, Color::White, 1.0);
}

#[test]
fn test_colour_filter_drops_best_hypothesis() {
    let classifier = StoneClassifier::default();
    let last = board(BoardSize::Nine, &[(2, 2, Color::Black)]);
    let frame = frame_with(&last, 5, 5, Color::White, 2);

    assert_eq!(classifier.best_move(&last, &frame, true, false), None);
    assert_eq!(classifier.classify(&last, &frame, true, false).unwrap(), last);
}

#[test]
fn test_filter_applies_after_selection() {
    // A second handicap stone brightens its empty neighbours by contrast,
    // and the first of them in row-major order outranks the stone itself.
    // Filtering happens after selection, so no move is reported.
    let classifier = StoneClassifier::default();
    let last = board(BoardSize::Nine, &[(2, 2, Color::Black)]);
    let frame = frame_with(&last, 6, 6, Color::Black, 3);

    let hypotheses = classifier.hypotheses(&last, &frame);
    assert!(hypotheses
        .iter()
        .any(|h| h.position == Position::new(6, 6) && h.color == Color::Black));
    assert_hypothesis(hypotheses.first().copied(), 5, 6, Color::White, 1.0);

    assert_eq!(classifier.best_move(&last, &frame, true, false), None);
}

#[test]
fn test_mixed_phase_black_and_white() {
    let classifier = StoneClassifier::default();

    let last = board(BoardSize::Nine, &[(2, 2, Color::Black), (5, 5, Color::White)]);
    let frame = frame_with(&last, 6, 2, Color::Black, 5);
    assert_hypothesis(classifier.best_move(&last, &frame, true, false), 6, 2, Color::Black, 1.0);

    let last = last.with_stone(Position::new(6, 2), Color::Black).unwrap();
    let frame = frame_with(&last, 3, 6, Color::White, 6);
    assert_hypothesis(classifier.best_move(&last, &frame, false, true), 3, 6, Color::White, 0.99);

    // Unchanged frame
    let frame = BoardRenderer::new(7).render(&last);
    assert_eq!(classifier.best_move(&last, &frame, true, true), None);
}

#[test]
fn test_other_board_sizes() {
    let classifier = StoneClassifier::default();

    let last = BoardState::new(BoardSize::Thirteen);
    let frame = frame_with(&last, 6, 6, Color::Black, 8);
    assert_hypothesis(classifier.best_move(&last, &frame, true, true), 6, 6, Color::Black, 1.0);

    let last = board(
        BoardSize::Thirteen,
        &[(3, 3, Color::Black), (9, 9, Color::White), (3, 9, Color::Black)],
    );
    let frame = frame_with(&last, 6, 6, Color::White, 9);
    assert_hypothesis(classifier.best_move(&last, &frame, true, true), 6, 6, Color::White, 0.99);

    let last = board(
        BoardSize::Nineteen,
        &[
            (3, 3, Color::Black),
            (15, 15, Color::White),
            (3, 15, Color::Black),
            (15, 3, Color::White),
        ],
    );
    let frame = frame_with(&last, 9, 9, Color::Black, 10);
    assert_hypothesis(classifier.best_move(&last, &frame, true, true), 9, 9, Color::Black, 1.0);
}

#[test]
fn test_detection_is_deterministic() {
    let classifier = StoneClassifier::default();
    let last = board(BoardSize::Nine, &[(2, 2, Color::Black), (5, 5, Color::White)]);
    let frame = frame_with(&last, 6, 2, Color::Black, 11);

    let first = classifier.hypotheses(&last, &frame);
    for _ in 0..3 {
        assert_eq!(classifier.hypotheses(&last, &frame), first);
    }
}

// =============================================================================
// State-free detection
// =============================================================================

#[test]
fn test_classify_fresh() {
    let classifier = StoneClassifier::default();
    let expected = board(
        BoardSize::Nine,
        &[(2, 2, Color::Black), (5, 5, Color::White), (6, 6, Color::Black)],
    );
    let frame = BoardRenderer::new(12).render(&expected);

    assert_eq!(classifier.classify_fresh(&frame, BoardSize::Nine).unwrap(), expected);

    let empty = BoardState::new(BoardSize::Nine);
    let frame = BoardRenderer::new(13).render(&empty);
    assert_eq!(classifier.classify_fresh(&frame, BoardSize::Nine).unwrap(), empty);
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn test_report_only_with_diagnostics() {
    let last = board(BoardSize::Nine, &[(2, 2, Color::Black), (5, 5, Color::White)]);
    let frame = frame_with(&last, 6, 2, Color::Black, 14);

    let quiet = StoneClassifier::default();
    assert!(quiet.detect(&last, &frame, true, true).unwrap().report.is_none());

    let diagnostics = Diagnostics::none().with_stone_detection(true);
    let verbose = StoneClassifier::new(ClassifierConfig::default().with_diagnostics(diagnostics));
    let detection = verbose.detect(&last, &frame, true, true).unwrap();
    let report = detection.report.expect("report");

    assert_eq!(report.phase, Phase::Mixed);
    assert_eq!(report.cells.len(), 79);
    assert_eq!(report.statistics.count(Stone::Black), 1);
    assert_eq!(report.statistics.count(Stone::White), 1);
    assert_eq!(report.chosen, detection.chosen);

    let cell = report.cell(Position::new(6, 2)).unwrap();
    assert_eq!(cell.verdict.stone, Stone::Black);
    assert!(report.cell(Position::new(2, 2)).is_none());
    assert_eq!(report.stone_cells().count(), 1);

    let text = report.to_string();
    assert!(text.contains("phase: Mixed"));
    assert!(text.contains("chosen: black (6, 2)"));
}

// =============================================================================
// Classifier and record together
// =============================================================================

#[test]
fn test_frames_drive_game_record() {
    let classifier = StoneClassifier::default();
    let mut record = GameRecord::new(BoardSize::Nine, "Alice", "Bob", "6.5");

    let script = [
        (2, 2, Color::Black),
        (5, 5, Color::White),
        (6, 2, Color::Black),
        (3, 6, Color::White),
    ];

    for (seed, &(row, col, color)) in script.iter().enumerate() {
        let last = record.last_board().clone();

        // A frame with no new stone changes nothing
        let still = BoardRenderer::new(100 + seed as u64).render(&last);
        let candidate = classifier
            .classify(&last, &still, record.can_play(Color::Black), record.can_play(Color::White))
            .unwrap();
        assert!(!record.add_move_if_valid(&candidate));

        let frame = frame_with(&last, row, col, color, seed as u64);
        let candidate = classifier
            .classify(&last, &frame, record.can_play(Color::Black), record.can_play(Color::White))
            .unwrap();
        assert!(record.add_move_if_valid(&candidate), "move {seed} not detected");
    }

    assert_eq!(record.move_count(), 4);
    assert!(record
        .to_sgf()
        .ends_with(";B[cc];W[ff];B[cg];W[gd])"));
}
