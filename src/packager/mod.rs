//! Directory tree packager.
//!
//! Provides [`TreePackager`] to walk a directory and turn it into a
//! [`Package`]: a [`DirectoryNode`] tree mirroring the filesystem plus the
//! [`ContentTable`] of escaped file contents. Sub-modules:
//!
//! - [`source`] – Tree I/O abstraction (local filesystem vs. in-memory)

pub mod source;

pub use source::*;

use crate::error::{PackError, Result};
use crate::generator::escape::escape_long_string;
use crate::model::*;
use camino::{Utf8Path, Utf8PathBuf};
use glob::Pattern;

/// Order in which the children of a directory are visited.
///
/// Visitation order decides both the manifest order and the content ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildOrder {
    /// Whatever order the source lists entries in. Not stable across
    /// platforms or filesystems.
    #[default]
    Listing,
    /// Sorted by entry name (byte order).
    Name,
}

/// Tree packager. Generic over [`ContentSource`] so it can read from the
/// filesystem ([`FsSource`]) or from any other tree-shaped source.
pub struct TreePackager<S: ContentSource> {
    source: S,
    order: ChildOrder,
    exclude: Vec<Pattern>,
    excluded_paths: Vec<Utf8PathBuf>,
}

impl<S: ContentSource> TreePackager<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            order: ChildOrder::default(),
            exclude: Vec::new(),
            excluded_paths: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: ChildOrder) -> Self {
        self.order = order;
        self
    }

    /// Skip entries (and their subtrees) whose name matches any pattern.
    pub fn with_exclude(mut self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.exclude = patterns.into_iter().collect();
        self
    }

    /// Skip the entry at exactly `path`, e.g. the installer being written.
    ///
    /// Compared against child paths as the source lists them, so `path` must
    /// be spelled the same way as the root passed to [`Self::package`].
    pub fn with_excluded_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.excluded_paths.push(path.into());
        self
    }

    /// Package the directory at `root`.
    ///
    /// Fails with [`PackError::InvalidInput`] if `root` is not a directory;
    /// nothing is read in that case. Any unreadable file or directory, or an
    /// entry whose type cannot be determined, aborts the whole walk.
    pub fn package(&mut self, root: impl AsRef<Utf8Path>) -> Result<Package> {
        let root = root.as_ref();
        match self.source.kind(root)? {
            EntryKind::Directory => {}
            EntryKind::Missing => {
                return Err(PackError::invalid_input(format!("{} does not exist", root)));
            }
            _ => {
                return Err(PackError::invalid_input(format!(
                    "{} is not a directory; a single file cannot be packaged",
                    root
                )));
            }
        }

        let name = root.file_name().unwrap_or(root.as_str());
        let mut node = DirectoryNode::new(name);
        let mut contents = ContentTable::new();
        self.package_dir(root, &mut node, &mut contents)?;
        Ok(Package {
            root: node,
            contents,
        })
    }

    fn package_dir(
        &mut self,
        path: &Utf8Path,
        node: &mut DirectoryNode,
        contents: &mut ContentTable,
    ) -> Result<()> {
        log::debug!("Entering directory '{}'", path);
        for child in self.children_of(path)? {
            let Some(name) = child.file_name() else {
                continue;
            };
            match self.source.kind(&child)? {
                EntryKind::File => {
                    log::info!("Packaging file '{}'...", child);
                    let text = self.source.read_to_string(&child)?;
                    let code = contents.push(escape_long_string(&text)?);
                    node.insert(Node::File(FileNode {
                        name: name.to_string(),
                        code,
                    }));
                }
                EntryKind::Directory => {
                    let mut sub = DirectoryNode::new(name);
                    self.package_dir(&child, &mut sub, contents)?;
                    node.insert(Node::Directory(sub));
                }
                EntryKind::Other | EntryKind::Missing => {
                    log::warn!("Skipping '{}': not a regular file or directory", child);
                }
            }
        }
        Ok(())
    }

    fn children_of(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut children = self.source.list_dir(path)?;
        if !self.exclude.is_empty() || !self.excluded_paths.is_empty() {
            children.retain(|child| {
                let excluded = self.excluded_paths.contains(child)
                    || child
                        .file_name()
                        .is_some_and(|name| self.exclude.iter().any(|p| p.matches(name)));
                if excluded {
                    log::debug!("Excluding '{}'", child);
                }
                !excluded
            });
        }
        if self.order == ChildOrder::Name {
            children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }
        Ok(children)
    }
}
