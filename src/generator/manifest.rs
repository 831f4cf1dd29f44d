//! Generate the Lua manifest and content-list literals from a [`Package`].
//!
//! The manifest refers to the `DIRECTORY` and `FILE` constants, which the
//! installer template defines before the manifest is evaluated.

use super::escape::lua_quote;
use crate::model::*;

/// Generate the nested table literal describing the tree below `root`.
///
/// Uses tab indentation with one field per line.
pub fn generate_manifest(root: &DirectoryNode) -> String {
    let mut out = String::with_capacity(1024);
    write_directory(&mut out, root, 0);
    out
}

/// Generate the list literal holding every content-table entry as a
/// long-bracket string, in id order.
pub fn generate_content_list(contents: &ContentTable) -> String {
    let mut out = String::with_capacity(contents.iter().map(|c| c.len() + 6).sum::<usize>() + 4);
    out.push_str("{\n");
    for (i, entry) in contents.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        out.push_str("[[");
        out.push_str(entry);
        out.push_str("]]");
    }
    if !contents.is_empty() {
        out.push('\n');
    }
    out.push('}');
    out
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push('\t');
    }
}

fn write_node(out: &mut String, node: &Node, level: usize) {
    match node {
        Node::Directory(dir) => write_directory(out, dir, level),
        Node::File(file) => write_file(out, file, level),
    }
}

// Nodes start after the caller's indentation and end on their closing brace,
// without a trailing newline.
fn write_directory(out: &mut String, dir: &DirectoryNode, level: usize) {
    out.push_str("{\n");
    write_field(out, level + 1, "name", &lua_quote(&dir.name));
    write_field(out, level + 1, "type", "DIRECTORY");
    indent(out, level + 1);
    if dir.children.is_empty() {
        out.push_str("children = {}\n");
    } else {
        out.push_str("children = {\n");
        for (i, child) in dir.children.values().enumerate() {
            if i > 0 {
                out.push_str(",\n");
            }
            indent(out, level + 2);
            write_node(out, child, level + 2);
        }
        out.push('\n');
        indent(out, level + 1);
        out.push_str("}\n");
    }
    indent(out, level);
    out.push('}');
}

fn write_file(out: &mut String, file: &FileNode, level: usize) {
    out.push_str("{\n");
    write_field(out, level + 1, "name", &lua_quote(&file.name));
    write_field(out, level + 1, "type", "FILE");
    indent(out, level + 1);
    out.push_str(&format!("code = {}\n", file.code));
    indent(out, level);
    out.push('}');
}

fn write_field(out: &mut String, level: usize, key: &str, value: &str) {
    indent(out, level);
    out.push_str(&format!("{} = {},\n", key, value));
}
