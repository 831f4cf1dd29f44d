//! Content source abstraction for reading the tree to be packaged.

use crate::error::{PackError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// What a path refers to, as seen by a [`ContentSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Exists but is neither a regular file nor a directory (socket, FIFO,
    /// dangling link, ...).
    Other,
    Missing,
}

/// Trait for abstracting tree I/O (local filesystem vs. in-memory trees).
pub trait ContentSource {
    /// Classify a path. Symbolic links are classified by their target.
    ///
    /// Fails when the type of an existing entry cannot be determined.
    fn kind(&mut self, path: &Utf8Path) -> Result<EntryKind>;
    /// List the entries of a directory, returning full paths in listing order.
    fn list_dir(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>>;
    /// Read a file and return its content as a string.
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String>;
}

/// Reads files directly from the local filesystem.
pub struct FsSource;

impl ContentSource for FsSource {
    fn kind(&mut self, path: &Utf8Path) -> Result<EntryKind> {
        match std::fs::metadata(path.as_std_path()) {
            Ok(meta) if meta.is_file() => Ok(EntryKind::File),
            Ok(meta) if meta.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::Other),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // A dangling symlink still has link metadata.
                if std::fs::symlink_metadata(path.as_std_path()).is_ok() {
                    Ok(EntryKind::Other)
                } else {
                    Ok(EntryKind::Missing)
                }
            }
            Err(source) => Err(PackError::UnreadableFile {
                path: path.to_owned(),
                source,
            }),
        }
    }

    fn list_dir(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let unreadable = |source: io::Error| PackError::UnreadableDirectory {
            path: path.to_owned(),
            source,
        };
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path.as_std_path()).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let p = Utf8PathBuf::from_path_buf(entry.path()).map_err(|p| {
                unreadable(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("non-UTF-8 entry name {}", p.display()),
                ))
            })?;
            entries.push(p);
        }
        Ok(entries)
    }

    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        std::fs::read_to_string(path.as_std_path()).map_err(|source| PackError::UnreadableFile {
            path: path.to_owned(),
            source,
        })
    }
}
