//! Deterministic ZIP output shared by the packager and the bundler.

use deck_core::{Error, Result};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// One file of an archive, in write order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub path: String,
    pub data: Vec<u8>,
}

impl Entry {
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }
}

/// Write `entries` in order. Every entry carries the same fixed timestamp,
/// so equal input gives byte-identical archives.
pub(crate) fn write_archive(entries: &[Entry]) -> Result<Vec<u8>> {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        zip.start_file(entry.path.as_str(), options)
            .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", entry.path, e)))?;
        zip.write_all(&entry.data)?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
    Ok(cursor.into_inner())
}
