//! Versioned binary snapshots of a game record.
//!
//! Used to park an in-progress game (app backgrounded, camera restarted)
//! and restore it later. Layout, all integers little-endian:
//!
//! | offset | size | field                      |
//! |--------|------|----------------------------|
//! | 0      | 4    | magic `KIFU`               |
//! | 4      | 4    | format version             |
//! | 8      | 4    | payload length             |
//! | 12     | 4    | CRC32 of the payload       |
//! | 16     | n    | `bincode` payload          |
//!
//! Decoding rejects unknown versions, checksum mismatches, truncated or
//! trailing data, and records whose history is inconsistent.

use std::io::{Read, Write};

use tracing::debug;

use super::game::GameRecord;
use crate::error::{KifuError, Result};

const MAGIC: &[u8; 4] = b"KIFU";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 16;

/// Encode a record into a snapshot blob.
pub fn encode(record: &GameRecord) -> Result<Vec<u8>> {
    frame(&bincode::serialize(record)?)
}

fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    let length = u32::try_from(payload.len())
        .map_err(|_| KifuError::Snapshot(format!("payload too large: {} bytes", payload.len())))?;

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Decode a snapshot blob.
///
/// The restored record has diagnostics turned off.
pub fn decode(data: &[u8]) -> Result<GameRecord> {
    if data.len() < HEADER_SIZE {
        return Err(KifuError::Snapshot(format!(
            "snapshot too short: expected at least {HEADER_SIZE} bytes, got {}",
            data.len()
        )));
    }
    if &data[0..4] != MAGIC {
        return Err(KifuError::Snapshot("invalid magic (expected KIFU)".to_string()));
    }

    let version = read_u32_le(data, 4)?;
    if version != VERSION {
        return Err(KifuError::Snapshot(format!(
            "unsupported version: expected {VERSION}, got {version}"
        )));
    }

    let length = read_u32_le(data, 8)? as usize;
    let payload = &data[HEADER_SIZE..];
    if payload.len() < length {
        return Err(KifuError::Snapshot(format!(
            "truncated payload: expected {length} bytes, got {}",
            payload.len()
        )));
    }
    if payload.len() > length {
        return Err(KifuError::Snapshot("snapshot has trailing bytes".to_string()));
    }

    let expected_crc = read_u32_le(data, 12)?;
    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(KifuError::Snapshot(format!(
            "CRC32 mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
        )));
    }

    let record: GameRecord = bincode::deserialize(payload)?;
    record.check_consistency()?;
    debug!(moves = record.move_count(), "restored game snapshot");
    Ok(record)
}

/// Write a snapshot to any writer.
pub fn write_snapshot<W: Write>(record: &GameRecord, mut writer: W) -> Result<()> {
    writer.write_all(&encode(record)?)?;
    writer.flush()?;
    Ok(())
}

/// Read a snapshot from any reader.
pub fn read_snapshot<R: Read>(mut reader: R) -> Result<GameRecord> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode(&data)
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or_else(|| KifuError::Snapshot("unexpected EOF while reading u32".to_string()))?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::core::{BoardSize, Color, Move, Position, Stone};
    use crate::record::Application;

    /// Same field layout as `GameRecord`, with unchecked boards.
    #[derive(Serialize)]
    struct RawRecord {
        size: BoardSize,
        black_player: String,
        white_player: String,
        komi: String,
        application: Application,
        boards: Vec<RawBoard>,
        moves: Vec<Move>,
        undo_count: u32,
        manual_add_count: u32,
    }

    #[derive(Serialize)]
    struct RawBoard {
        size: BoardSize,
        cells: Vec<Stone>,
    }

    fn raw_record(cells: Vec<Stone>) -> RawRecord {
        RawRecord {
            size: BoardSize::Nine,
            black_player: "Alice".to_string(),
            white_player: "Bob".to_string(),
            komi: "6.5".to_string(),
            application: Application::default(),
            boards: vec![RawBoard {
                size: BoardSize::Nine,
                cells,
            }],
            moves: Vec::new(),
            undo_count: 0,
            manual_add_count: 0,
        }
    }

    fn framed(cells: Vec<Stone>) -> Vec<u8> {
        frame(&bincode::serialize(&raw_record(cells)).unwrap()).unwrap()
    }

    fn sample_record() -> GameRecord {
        let mut record = GameRecord::new(BoardSize::Nine, "Alice", "Bob", "5.5");
        for (row, col, color) in [
            (0, 1, Color::Black),
            (0, 0, Color::White),
            (1, 0, Color::Black),
        ] {
            let candidate = record
                .last_board()
                .with_stone(Position::new(row, col), color)
                .unwrap();
            assert!(record.add_move_if_valid(&candidate));
        }
        record.note_manual_addition();
        record
    }

    #[test]
    fn test_snapshot_restores_record() {
        let record = sample_record();
        let restored = decode(&encode(&record).unwrap()).unwrap();

        assert_eq!(restored.boards(), record.boards());
        assert_eq!(restored.moves(), record.moves());
        assert_eq!(restored.black_player(), "Alice");
        assert_eq!(restored.komi(), "5.5");
        assert_eq!(restored.manual_add_count(), 1);
    }

    #[test]
    fn test_snapshot_through_io() {
        let record = sample_record();
        let mut buffer = Vec::new();
        write_snapshot(&record, &mut buffer).unwrap();

        let restored = read_snapshot(buffer.as_slice()).unwrap();
        assert_eq!(restored.move_count(), 3);
    }

    #[test]
    fn test_rejects_invalid_magic() {
        let mut bytes = encode(&sample_record()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(decode(&bytes), Err(KifuError::Snapshot(_))));
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let mut bytes = encode(&sample_record()).unwrap();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("unsupported version"));
    }

    #[test]
    fn test_rejects_crc_mismatch() {
        let mut bytes = encode(&sample_record()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("CRC32 mismatch"));
    }

    #[test]
    fn test_rejects_truncated_and_trailing() {
        let bytes = encode(&sample_record()).unwrap();

        let err = decode(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(err.to_string().contains("truncated"));

        let mut longer = bytes.clone();
        longer.push(0);
        let err = decode(&longer).unwrap_err();
        assert!(err.to_string().contains("trailing"));

        assert!(decode(&bytes[..10]).is_err());
    }

    #[test]
    fn test_rejects_board_with_wrong_cell_count() {
        let restored = decode(&framed(vec![Stone::Empty; 81])).unwrap();
        assert!(restored
            .last_board()
            .with_stone(Position::new(4, 4), Color::Black)
            .is_ok());

        assert!(matches!(decode(&framed(Vec::new())), Err(KifuError::Codec(_))));
        assert!(matches!(decode(&framed(vec![Stone::Empty; 80])), Err(KifuError::Codec(_))));
    }
}
