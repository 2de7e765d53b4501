//! Save/load for the city engine.
//!
//! A save file is a 28-byte header (magic, version, flags, checksum)
//! followed by an LZ4-compressed bitcode payload holding the full session:
//! city ledger, board, run status, and turn history. Writes go through the
//! write-rename pattern so an interrupted save never clobbers the previous
//! file. Headerless payloads (raw bitcode) are still decoded.

use std::path::Path;

use simulation::city::{CityState, GameStatus};
use simulation::grid::CityGrid;
use simulation::snapshot::TurnHistory;

mod atomic_write;
mod file_header;
mod save_codec;
mod save_error;
mod save_restore;
mod save_types;

pub use atomic_write::atomic_write;
pub use file_header::{FileHeader, HEADER_SIZE, MAGIC};
pub use save_error::SaveError;
pub use save_restore::{capture, restore, SavedSession};
pub use save_types::{SaveData, CURRENT_SAVE_VERSION};

use file_header::{unwrap_header, wrap_with_header, FLAG_COMPRESSED};

/// Serialize the live session into save-file bytes.
pub fn save_to_bytes(
    city: &CityState,
    grid: &CityGrid,
    status: GameStatus,
    history: &TurnHistory,
) -> Vec<u8> {
    let encoded = bitcode::encode(&capture(city, grid, status, history));
    let compressed = lz4_flex::compress(&encoded);
    wrap_with_header(&compressed, FLAG_COMPRESSED, encoded.len() as u32)
}

/// Parse save-file bytes back into a live session.
///
/// Bytes that do not start with the magic are treated as a headerless
/// payload (raw uncompressed bitcode) and decoded directly.
///
/// # Errors
///
/// Fails on a bad header or checksum, a payload that does not decompress
/// or decode, or a save written by a newer build.
pub fn load_from_bytes(bytes: &[u8]) -> Result<SavedSession, SaveError> {
    let encoded;
    if bytes.len() >= 4 && bytes[..4] == MAGIC {
        let (header, payload) = unwrap_header(bytes)?;
        encoded = if header.flags & FLAG_COMPRESSED != 0 {
            lz4_flex::decompress(payload, header.uncompressed_size as usize)
                .map_err(|e| SaveError::Decode(format!("decompression failed: {e}")))?
        } else {
            payload.to_vec()
        };
    } else {
        encoded = bytes.to_vec();
    }
    let data: SaveData = bitcode::decode(&encoded)?;
    restore(&data)
}

/// Write a save file atomically.
pub fn save_to_file(
    path: &Path,
    city: &CityState,
    grid: &CityGrid,
    status: GameStatus,
    history: &TurnHistory,
) -> Result<(), SaveError> {
    atomic_write(path, &save_to_bytes(city, grid, status, history))?;
    Ok(())
}

/// Read and parse a save file.
pub fn load_from_file(path: &Path) -> Result<SavedSession, SaveError> {
    let bytes = std::fs::read(path)?;
    load_from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::grid::BuildingType;
    use simulation::resources::Resource;
    use simulation::ruleset::Ruleset;

    fn sample_session() -> (CityState, CityGrid, GameStatus, TurnHistory) {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        city.money = 87;
        city.population = 12;
        city.turn = 4;
        city.last_turn_stats.power_utilization = 100;

        let mut grid = CityGrid::new(rules.grid_size);
        grid.place_tile(0, 0, BuildingType::Power, 1);
        grid.place_tile(1, 0, BuildingType::Residential, 2);
        grid.place_tile(2, 0, BuildingType::Factory, 1);
        grid.tile_at_mut(2, 0)
            .unwrap()
            .storage
            .add(Resource::RawGoods, 5);
        (city, grid, GameStatus::default(), TurnHistory::default())
    }

    #[test]
    fn bytes_roundtrip_is_lossless() {
        let (city, grid, status, history) = sample_session();
        let bytes = save_to_bytes(&city, &grid, status, &history);
        let session = load_from_bytes(&bytes).unwrap();
        assert_eq!(session.city, city);
        assert_eq!(session.grid, grid);
        assert_eq!(session.status, status);
        assert!(session.history.is_empty());
    }

    #[test]
    fn corrupting_one_byte_is_detected() {
        let (city, grid, status, history) = sample_session();
        let mut bytes = save_to_bytes(&city, &grid, status, &history);
        let mid = HEADER_SIZE + (bytes.len() - HEADER_SIZE) / 2;
        bytes[mid] ^= 0xFF;
        assert!(matches!(
            load_from_bytes(&bytes),
            Err(SaveError::Header(_))
        ));
    }

    #[test]
    fn truncated_header_is_rejected() {
        let (city, grid, status, history) = sample_session();
        let bytes = save_to_bytes(&city, &grid, status, &history);
        assert!(load_from_bytes(&bytes[..10]).is_err());
    }

    #[test]
    fn headerless_payloads_still_load() {
        let (city, grid, status, history) = sample_session();
        let encoded = bitcode::encode(&capture(&city, &grid, status, &history));
        let session = load_from_bytes(&encoded).unwrap();
        assert_eq!(session.city, city);
        assert_eq!(session.grid, grid);
    }

    #[test]
    fn uncompressed_flagged_payloads_still_load() {
        let (city, grid, status, history) = sample_session();
        let encoded = bitcode::encode(&capture(&city, &grid, status, &history));
        let bytes = file_header::wrap_with_header(&encoded, 0, encoded.len() as u32);
        let session = load_from_bytes(&bytes).unwrap();
        assert_eq!(session.city, city);
        assert_eq!(session.grid, grid);
    }

    #[test]
    fn file_roundtrip() {
        let dir = std::env::temp_dir().join("city_save_file_roundtrip");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("autosave.sav");

        let (city, grid, status, history) = sample_session();
        save_to_file(&path, &city, &grid, status, &history).unwrap();
        let session = load_from_file(&path).unwrap();
        assert_eq!(session.city, city);
        assert_eq!(session.grid, grid);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_from_file(Path::new("/nonexistent/dir/save.sav")).unwrap_err();
        assert!(matches!(err, SaveError::Io(_)));
    }
}
