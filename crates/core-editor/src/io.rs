//! Plain-text file import and export.
//!
//! Import reads at most `max_bytes` raw bytes *before* decoding, so an
//! oversized or hostile file never reaches the decoder in full. A multi-byte
//! sequence cut by the limit decodes to U+FFFD.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const MAX_IMPORT_BYTES: usize = 10_000;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
#[error("failed to write {path}: {source}")]
pub struct ExportError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Decode the first `max_bytes` of `bytes` as UTF-8 (lossy).
pub fn decode_truncated(bytes: &[u8], max_bytes: usize) -> String {
    let cut = &bytes[..bytes.len().min(max_bytes)];
    String::from_utf8_lossy(cut).into_owned()
}

pub fn import(path: &Path, max_bytes: usize) -> Result<String, ImportError> {
    let read = |path: &Path| -> io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let mut bytes = Vec::new();
        file.take(max_bytes as u64).read_to_end(&mut bytes)?;
        Ok(bytes)
    };
    match read(path) {
        Ok(bytes) => {
            tracing::info!(target: "editor.io", bytes = bytes.len(), max_bytes, "file_imported");
            Ok(decode_truncated(&bytes, max_bytes))
        }
        Err(source) => {
            tracing::error!(target: "editor.io", ?source, "file_import_error");
            Err(ImportError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

pub fn export(path: &Path, text: &str) -> Result<(), ExportError> {
    match std::fs::write(path, text.as_bytes()) {
        Ok(()) => {
            tracing::info!(target: "editor.io", bytes = text.len(), "file_exported");
            Ok(())
        }
        Err(source) => {
            tracing::error!(target: "editor.io", ?source, "file_export_error");
            Err(ExportError {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
