use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::SsdError;

/// Writes packed pixels to `path` as raw little-endian `u16`s, no header.
pub fn write_dump(path: &Path, values: &[u16]) -> Result<(), SsdError> {
    let io_err = |source| SsdError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    for value in values {
        out.write_all(&value.to_le_bytes()).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    log::info!("[SSD] Wrote {} pixels to {}", values.len(), path.display());
    Ok(())
}
