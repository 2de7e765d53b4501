// ---------------------------------------------------------------------------
// SaveError: typed errors for save/load operations
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that can occur during save/load operations.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// Bitcode decoding failed (corrupt or invalid save data).
    Decode(String),
    /// The file header is malformed or fails its checksum.
    Header(String),
    /// Save file version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::Header(msg) => write!(f, "Header error: {msg}"),
            SaveError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: save is v{found}, but this build only supports up to v{expected_max}"
            ),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}
