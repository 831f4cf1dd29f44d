//! Resolved configuration for one packaging run.

use crate::error::{PackError, Result};
use crate::generator::installer::{InstallerMeta, TemplateSource};
use crate::packager::ChildOrder;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use glob::Pattern;

/// Output file name used when none is configured.
pub const DEFAULT_OUTPUT: &str = "install.lua";

/// Entry point file looked up inside the packaged root by default.
pub const DEFAULT_ENTRY_FILE: &str = "main.lua";

#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Directory to package.
    pub root: Utf8PathBuf,
    /// Installer file to write.
    pub output: Utf8PathBuf,
    pub template: TemplateSource,
    pub order: ChildOrder,
    pub exclude: Vec<Pattern>,
    pub meta: InstallerMeta,
}

impl PackConfig {
    /// Configuration with every default applied for `root`.
    ///
    /// The root is made absolute and symlink-free so that `.` and similar
    /// paths still yield the real directory name. Product name and entry point derive from it:
    /// packaging `LuxOS/` boots `LuxOS/main.lua`.
    pub fn new(root: impl AsRef<Utf8Path>) -> Result<Self> {
        let root = absolute(root.as_ref())?;
        let name = root
            .file_name()
            .ok_or_else(|| PackError::invalid_input(format!("{} has no directory name", root)))?
            .to_string();
        Ok(Self {
            output: Utf8PathBuf::from(DEFAULT_OUTPUT),
            template: TemplateSource::default(),
            order: ChildOrder::default(),
            exclude: Vec::new(),
            meta: InstallerMeta {
                entry_point: format!("{}/{}", name, DEFAULT_ENTRY_FILE),
                product_name: name,
            },
            root,
        })
    }

    /// Parse and add exclusion glob patterns.
    pub fn exclude_patterns<'a>(mut self, patterns: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        for p in patterns {
            let pattern = Pattern::new(p).map_err(|e| {
                PackError::invalid_input(format!("bad exclude pattern {:?}: {}", p, e))
            })?;
            self.exclude.push(pattern);
        }
        Ok(self)
    }
}

/// Absolute form of `path` with symlinks resolved where it exists.
///
/// A path that does not exist yet (like an output file) resolves through its
/// parent directory. Only when neither exists are `.` and `..` removed
/// lexically.
pub(crate) fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if let Ok(canonical) = path.canonicalize_utf8() {
        return Ok(canonical);
    }
    let abs = std::path::absolute(path.as_std_path()).map_err(|e| {
        PackError::invalid_input(format!("cannot resolve {}: {}", path, e))
    })?;
    let abs = Utf8PathBuf::from_path_buf(abs)
        .map_err(|p| PackError::invalid_input(format!("non-UTF-8 path {}", p.display())))?;
    if let (Some(parent), Some(name)) = (abs.parent(), abs.file_name()) {
        if let Ok(parent) = parent.canonicalize_utf8() {
            return Ok(parent.join(name));
        }
    }
    let mut normalized = Utf8PathBuf::new();
    for component in abs.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
