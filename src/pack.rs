//! End-to-end packaging: walk, render, write.

use crate::config::{PackConfig, absolute};
use crate::error::Result;
use crate::generator::installer::{render_installer, write_installer};
use crate::model::Package;
use crate::packager::{ContentSource, FsSource, TreePackager};

/// What a successful run produced.
#[derive(Debug)]
pub struct PackReport {
    pub package: Package,
    /// Size of the written installer in bytes.
    pub bytes: usize,
}

/// Package `config.root` from the local filesystem and write the installer.
pub fn pack(config: &PackConfig) -> Result<PackReport> {
    pack_from(config, FsSource)
}

/// Like [`pack`], reading the tree from `source`.
///
/// The output file is only touched once the whole tree has been packaged and
/// rendered. An output file inside the root is never packaged itself, so
/// repeated runs produce the same installer.
pub fn pack_from<S: ContentSource>(config: &PackConfig, source: S) -> Result<PackReport> {
    let template = config.template.load()?;
    let output = absolute(&config.output)?;
    let package = TreePackager::new(source)
        .with_order(config.order)
        .with_exclude(config.exclude.iter().cloned())
        .with_excluded_path(output)
        .package(&config.root)?;
    let text = render_installer(&template, &package, &config.meta);
    write_installer(&config.output, &text)?;
    log::info!(
        "Packaged {} files into '{}' ({} bytes)",
        package.file_count(),
        config.output,
        text.len()
    );
    Ok(PackReport {
        package,
        bytes: text.len(),
    })
}
