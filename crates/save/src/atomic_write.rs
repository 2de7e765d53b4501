//! Atomic file write using the write-rename pattern.
//!
//! Writes to `{path}.tmp`, flushes with `sync_all()`, then renames onto the
//! final path so a crash mid-write cannot corrupt an existing save file.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Atomically writes `data` to `path`.
///
/// 1. Write to `{path}.tmp`
/// 2. `sync_all()` to flush to disk
/// 3. `rename` temp to final path (atomic on POSIX)
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp_path = {
        let mut os = path.as_os_str().to_owned();
        os.push(".tmp");
        std::path::PathBuf::from(os)
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
