//! Shared helpers for integration tests: an in-memory tree source and a tiny
//! evaluator for the Lua string expressions the generator emits.
#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use luapack::error::PackError;
use luapack::packager::{ContentSource, EntryKind};
use std::collections::{HashMap, HashSet};

/// Tree held in memory. Directories list children in insertion order.
#[derive(Default)]
pub struct MemSource {
    files: HashMap<Utf8PathBuf, String>,
    dirs: HashMap<Utf8PathBuf, Vec<Utf8PathBuf>>,
    unreadable: HashSet<Utf8PathBuf>,
    inaccessible: HashSet<Utf8PathBuf>,
}

impl MemSource {
    /// Build a tree below `root` from `(relative path, content)` pairs.
    pub fn new(root: &str, files: &[(&str, &str)]) -> Self {
        let mut source = MemSource::default();
        source.ensure_dir(Utf8Path::new(root));
        for (rel, content) in files {
            source.add_file(&Utf8Path::new(root).join(rel), content);
        }
        source
    }

    pub fn add_file(&mut self, path: &Utf8Path, content: &str) {
        let parent = path.parent().expect("file has a parent");
        self.ensure_dir(parent);
        self.dirs.get_mut(parent).unwrap().push(path.to_owned());
        self.files.insert(path.to_owned(), content.to_string());
    }

    pub fn add_dir(&mut self, path: &Utf8Path) {
        self.ensure_dir(path);
    }

    pub fn make_unreadable(&mut self, path: &Utf8Path) {
        self.unreadable.insert(path.to_owned());
    }

    /// Make even the entry type of `path` unknowable, like a failing `stat`.
    pub fn make_inaccessible(&mut self, path: &Utf8Path) {
        self.inaccessible.insert(path.to_owned());
    }

    fn ensure_dir(&mut self, path: &Utf8Path) {
        if self.dirs.contains_key(path) {
            return;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            self.ensure_dir(parent);
            self.dirs.get_mut(parent).unwrap().push(path.to_owned());
        }
        self.dirs.insert(path.to_owned(), Vec::new());
    }
}

impl ContentSource for MemSource {
    fn kind(&mut self, path: &Utf8Path) -> luapack::Result<EntryKind> {
        if self.inaccessible.contains(path) {
            return Err(PackError::UnreadableFile {
                path: path.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        Ok(if self.files.contains_key(path) {
            EntryKind::File
        } else if self.dirs.contains_key(path) {
            EntryKind::Directory
        } else {
            EntryKind::Missing
        })
    }

    fn list_dir(&mut self, path: &Utf8Path) -> luapack::Result<Vec<Utf8PathBuf>> {
        Ok(self.dirs.get(path).cloned().unwrap_or_default())
    }

    fn read_to_string(&mut self, path: &Utf8Path) -> luapack::Result<String> {
        if self.unreadable.contains(path) {
            return Err(PackError::UnreadableFile {
                path: path.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| PackError::UnreadableFile {
                path: path.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
    }
}

/// Lua 5.1 stops parsing after 200 nested syntax levels and every `..` adds
/// one. Leave headroom for the table constructors around each entry.
pub const MAX_CONCATS: usize = 190;

/// Evaluate a Lua expression made of level-0 long strings and double-quoted
/// strings joined by `..`, following the Lua 5.2+ lexer.
///
/// Also rejects what stock Lua refuses to parse: `[[` inside a long string
/// (Lua 5.1) and chains longer than [`MAX_CONCATS`].
pub fn eval_lua_concat(expr: &str) -> Result<String> {
    let mut out = String::new();
    let mut concats = 0;
    let mut rest = expr.trim_start();
    loop {
        if let Some(body) = rest.strip_prefix("[[") {
            let body = skip_first_newline(body);
            let end = body
                .find("]]")
                .ok_or_else(|| anyhow!("unterminated long string in {:?}", expr))?;
            let raw = &body[..end];
            if raw.contains("[[") {
                bail!("nested [[ in long string {:?}", raw);
            }
            push_normalized(&mut out, raw);
            rest = &body[end + 2..];
        } else if let Some(body) = rest.strip_prefix('"') {
            rest = read_quoted(body, &mut out)?;
        } else {
            bail!("expected a string at {:?}", rest);
        }
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(out);
        }
        rest = rest
            .strip_prefix("..")
            .ok_or_else(|| anyhow!("expected '..' at {:?}", rest))?
            .trim_start();
        concats += 1;
        if concats > MAX_CONCATS {
            bail!("more than {} '..' in one expression", MAX_CONCATS);
        }
    }
}

/// Evaluate `[[` + body + `]]`, the way content entries are emitted.
pub fn eval_long_body(body: &str) -> Result<String> {
    eval_lua_concat(&format!("[[{}]]", body))
}

/// Number of `..` operators outside of string literals in `expr`.
pub fn count_concats(expr: &str) -> usize {
    let mut count = 0;
    let mut rest = expr;
    while !rest.is_empty() {
        if let Some(body) = rest.strip_prefix("[[") {
            rest = body.find("]]").map_or("", |end| &body[end + 2..]);
        } else if let Some(body) = rest.strip_prefix('"') {
            let mut scratch = String::new();
            rest = read_quoted(body, &mut scratch).unwrap_or("");
        } else if let Some(tail) = rest.strip_prefix("..") {
            count += 1;
            rest = tail;
        } else {
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }
    }
    count
}

fn skip_first_newline(s: &str) -> &str {
    for nl in ["\r\n", "\n\r", "\n", "\r"] {
        if let Some(rest) = s.strip_prefix(nl) {
            return rest;
        }
    }
    s
}

fn push_normalized(out: &mut String, raw: &str) {
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' | '\r' => {
                let pair = if c == '\n' { '\r' } else { '\n' };
                if chars.peek() == Some(&pair) {
                    chars.next();
                }
                out.push('\n');
            }
            c => out.push(c),
        }
    }
}

fn read_quoted<'a>(body: &'a str, out: &mut String) -> Result<&'a str> {
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok(&body[i + 1..]),
            '\\' => {
                let (_, e) = chars.next().ok_or_else(|| anyhow!("dangling escape"))?;
                match e {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    d if d.is_ascii_digit() => {
                        let mut code = d.to_digit(10).unwrap();
                        for _ in 0..2 {
                            let (_, d) = chars.next().ok_or_else(|| anyhow!("short \\ddd"))?;
                            code = code * 10 + d.to_digit(10).ok_or_else(|| anyhow!("bad \\ddd"))?;
                        }
                        out.push(char::from_u32(code).ok_or_else(|| anyhow!("bad code"))?);
                    }
                    other => bail!("unsupported escape \\{}", other),
                }
            }
            '\n' => bail!("unescaped newline in quoted string"),
            c => out.push(c),
        }
    }
    bail!("unterminated quoted string")
}
