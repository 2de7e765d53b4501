// ---------------------------------------------------------------------------
// file_header – Save file header with magic bytes, version, and checksum
// ---------------------------------------------------------------------------
//
// Header format (28 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "MCTY"
//   [4..8]   Header format version (u32)
//   [8..12]  Flags (u32: bit 0 = payload is LZ4-compressed)
//   [12..20] Timestamp (Unix epoch, u64)
//   [20..24] Uncompressed data size (u32)
//   [24..28] xxHash32 checksum of the payload (everything after the header)
//
// On save: encode SaveData -> compress -> prepend header (checksum of the
// compressed payload). On load: check magic -> validate checksum -> strip
// header -> decompress -> decode.

use xxhash_rust::xxh32::xxh32;

use crate::save_error::SaveError;

/// Magic bytes identifying a save file.
pub const MAGIC: [u8; 4] = *b"MCTY";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 28;

/// Current header layout version, distinct from the SaveData schema version.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Flag bit: the payload is LZ4-compressed.
pub const FLAG_COMPRESSED: u32 = 1;

const XXHASH_SEED: u32 = 0;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub timestamp: u64,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

/// Wrap a payload with a file header.
///
/// Returns bytes: [header (28 bytes)] ++ [payload].
pub fn wrap_with_header(payload: &[u8], flags: u32, uncompressed_size: u32) -> Vec<u8> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&HEADER_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&timestamp.to_le_bytes());
    out.extend_from_slice(&uncompressed_size.to_le_bytes());
    out.extend_from_slice(&xxh32(payload, XXHASH_SEED).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Parse and validate the file header, returning it plus the payload bytes.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not start with the magic bytes
/// - The file is shorter than the fixed header
/// - The header format version is from a newer build
/// - The checksum does not match (data corruption)
pub fn unwrap_header(bytes: &[u8]) -> Result<(FileHeader, &[u8]), SaveError> {
    if bytes.len() < 4 || bytes[..4] != MAGIC {
        return Err(SaveError::Header(
            "not a save file (missing MCTY magic bytes)".to_string(),
        ));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(SaveError::Header(format!(
            "save file is too short ({} bytes, need at least {} for the header)",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let format_version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let flags = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let timestamp = u64::from_le_bytes([
        bytes[12], bytes[13], bytes[14], bytes[15], bytes[16], bytes[17], bytes[18], bytes[19],
    ]);
    let uncompressed_size = u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    let checksum = u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]);

    if format_version > HEADER_FORMAT_VERSION {
        return Err(SaveError::Header(format!(
            "save file uses header format version {format_version}, \
             but this build only supports up to {HEADER_FORMAT_VERSION}"
        )));
    }

    let payload = &bytes[HEADER_SIZE..];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != checksum {
        return Err(SaveError::Header(format!(
            "checksum mismatch (expected {checksum:#010X}, got {computed:#010X}); \
             the file may have been modified or damaged"
        )));
    }

    Ok((
        FileHeader {
            format_version,
            flags,
            timestamp,
            uncompressed_size,
            checksum,
        },
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_and_unwrap_roundtrip() {
        let data = b"hello world save data";
        let wrapped = wrap_with_header(data, FLAG_COMPRESSED, 1234);

        assert_eq!(&wrapped[..4], &MAGIC);
        assert_eq!(wrapped.len(), HEADER_SIZE + data.len());

        let (header, payload) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert_eq!(header.format_version, HEADER_FORMAT_VERSION);
        assert_eq!(header.flags, FLAG_COMPRESSED);
        assert_eq!(header.uncompressed_size, 1234);
        assert_eq!(payload, data);
    }

    #[test]
    fn missing_magic_is_rejected() {
        let err = unwrap_header(b"\x00\x01\x02\x03not a save").unwrap_err();
        assert!(format!("{err}").contains("magic"), "got: {err}");
    }

    #[test]
    fn truncated_header_is_rejected() {
        let err = unwrap_header(b"MCTY\x01\x00").unwrap_err();
        assert!(format!("{err}").contains("too short"), "got: {err}");
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let mut wrapped = wrap_with_header(b"test payload", 0, 12);
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xFF;

        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(
            format!("{err}").contains("checksum mismatch"),
            "got: {err}"
        );
    }

    #[test]
    fn future_header_version_is_rejected() {
        let mut wrapped = wrap_with_header(b"test payload", 0, 12);
        wrapped[4..8].copy_from_slice(&999u32.to_le_bytes());

        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(
            format!("{err}").contains("header format version 999"),
            "got: {err}"
        );
    }

    #[test]
    fn empty_payload_roundtrips() {
        let wrapped = wrap_with_header(b"", 0, 0);
        assert_eq!(wrapped.len(), HEADER_SIZE);
        let (header, payload) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert_eq!(header.uncompressed_size, 0);
        assert!(payload.is_empty());
    }
}
