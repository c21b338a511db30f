//! Local preview handles for staged media.
//!
//! A preview handle owns a temporary file holding the item's final bytes,
//! used to render a thumbnail. Release is a scoped-resource obligation:
//! dropping the handle always deletes the backing file, and `release`
//! surfaces deletion errors when the caller wants them.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// A revocable local reference to an item's displayable bytes.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    /// Write the given bytes to a fresh temporary file.
    pub fn from_bytes(bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(PreviewHandle { file })
    }

    /// Path to the preview file, for thumbnail rendering.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Owned copy of the path, useful for checking release in tests.
    pub fn path_buf(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Explicitly release the handle, deleting the backing file.
    /// Dropping the handle has the same effect.
    pub fn release(self) -> std::io::Result<()> {
        self.file.close()
    }
}
