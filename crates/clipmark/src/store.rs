// ABOUTME: Document store abstraction and filesystem implementation for writing notes.
// ABOUTME: Writes are create-only; an existing file at the target path is an error.

//! Note storage.
//!
//! The clipper only needs one capability from its host: create a new file
//! at a relative path. [`DocumentStore`] is that seam; [`FsStore`] is the
//! directory-backed implementation.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ClipError;
use crate::result::Note;

/// Where finished notes go.
pub trait DocumentStore {
    /// Create a new file. Fails if anything already exists at the path.
    fn write_new(&self, relative_path: &str, content: &str) -> Result<(), ClipError>;
}

/// A document store rooted at a filesystem directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentStore for FsStore {
    fn write_new(&self, relative_path: &str, content: &str) -> Result<(), ClipError> {
        let path = self.root.join(relative_path);
        if path.exists() {
            return Err(ClipError::store(
                relative_path,
                "Store",
                Some(anyhow::anyhow!("file already exists: {}", path.display())),
            ));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClipError::store(relative_path, "Store", Some(anyhow::anyhow!(e))))?;
        }
        std::fs::write(&path, content)
            .map_err(|e| ClipError::store(relative_path, "Store", Some(anyhow::anyhow!(e))))?;
        info!(path = %path.display(), "note written");
        Ok(())
    }
}

/// Write a note into the store, optionally inside a subfolder. Returns the
/// relative path the note was written to.
pub fn save_note(
    store: &dyn DocumentStore,
    note: &Note,
    folder: &str,
) -> Result<String, ClipError> {
    let path = if folder.is_empty() {
        format!("{}.md", note.filename)
    } else {
        format!("{}/{}.md", folder, note.filename)
    };
    store.write_new(&path, &note.content)?;
    Ok(path)
}
