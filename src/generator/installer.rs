//! Installer script rendering and output.
//!
//! A template is plain Lua with `{name}` placeholders. Substitution is a single
//! left-to-right pass: values are inserted verbatim and never rescanned, so
//! placeholder-looking text inside packaged files is left alone.

use super::escape::lua_quote;
use super::manifest::{generate_content_list, generate_manifest};
use crate::error::{PackError, Result};
use crate::model::Package;
use camino::{Utf8Path, Utf8PathBuf};
use std::borrow::Cow;
use std::io::Write;

/// Installer bundled with the binary.
pub const BUILTIN_TEMPLATE: &str = include_str!("templates/installer.lua");

/// Placeholder for the manifest literal.
pub const PACKAGE_DUMP: &str = "package_dump";
/// Placeholder for the content-list literal.
pub const RAW_PACKAGE_CONTENT: &str = "raw_package_content";
/// Placeholder for the Lua-quoted entry point path.
pub const ENTRY_POINT: &str = "entry_point";
/// Placeholder for the Lua-quoted product name.
pub const PRODUCT_NAME: &str = "product_name";

const REQUIRED: [&str; 2] = [PACKAGE_DUMP, RAW_PACKAGE_CONTENT];

/// Where the installer template comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    #[default]
    BuiltIn,
    File(Utf8PathBuf),
}

impl TemplateSource {
    pub fn load(&self) -> Result<Cow<'static, str>> {
        match self {
            TemplateSource::BuiltIn => Ok(Cow::Borrowed(BUILTIN_TEMPLATE)),
            TemplateSource::File(path) => std::fs::read_to_string(path.as_std_path())
                .map(Cow::Owned)
                .map_err(|source| PackError::MissingTemplate {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// Values for the optional placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerMeta {
    /// Path the installer runs once installation is finished.
    pub entry_point: String,
    pub product_name: String,
}

/// Render the complete installer for `package`.
pub fn render_installer(template: &str, package: &Package, meta: &InstallerMeta) -> String {
    for name in REQUIRED {
        if !template.contains(&format!("{{{}}}", name)) {
            log::warn!("Template has no {{{}}} placeholder", name);
        }
    }
    let manifest = generate_manifest(&package.root);
    let content_list = generate_content_list(&package.contents);
    let entry_point = lua_quote(&meta.entry_point);
    let product_name = lua_quote(&meta.product_name);
    substitute(
        template,
        &[
            (PACKAGE_DUMP, manifest.as_str()),
            (RAW_PACKAGE_CONTENT, content_list.as_str()),
            (ENTRY_POINT, entry_point.as_str()),
            (PRODUCT_NAME, product_name.as_str()),
        ],
    )
}

/// Replace every `{name}` in `template` with its value. Unknown `{...}`
/// sequences are copied through unchanged.
pub fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    while let Some(idx) = rest.find('{') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx + 1..];
        let hit = values.iter().find(|(name, _)| {
            tail.strip_prefix(name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Write `text` to `path` atomically, creating parent directories.
///
/// The text goes to a temporary file next to `path` which is then renamed
/// over it, so `path` is never left half-written.
pub fn write_installer(path: &Utf8Path, text: &str) -> Result<()> {
    let write_err = |source: std::io::Error| PackError::WriteOutput {
        path: path.to_owned(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    std::fs::create_dir_all(dir.as_std_path()).map_err(write_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir.as_std_path()).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path.as_std_path())
        .map_err(|e| write_err(e.error))?;
    Ok(())
}
