use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// Package – result of one packaging run
// ────────────────────────────────────────────────────────────────────────────

/// A packaged directory tree together with the escaped contents of its files.
///
/// Every [`FileNode::code`] in `root` resolves to exactly one entry of
/// `contents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub root: DirectoryNode,
    pub contents: ContentTable,
}

impl Package {
    /// Number of files in the tree (equal to the content table length).
    pub fn file_count(&self) -> usize {
        self.contents.len()
    }

    /// Render the manifest as pretty-printed JSON following the same schema as
    /// the Lua manifest literal, root included.
    pub fn manifest_json(&self) -> crate::Result<String> {
        let root = Node::Directory(self.root.clone());
        Ok(serde_json::to_string_pretty(&root)?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tree nodes
// ────────────────────────────────────────────────────────────────────────────

/// A node of the packaged tree.
///
/// Serialized with a `type` tag of `DIRECTORY` or `FILE`, so directories carry
/// `children` and files carry `code`, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    #[serde(rename = "DIRECTORY")]
    Directory(DirectoryNode),
    #[serde(rename = "FILE")]
    File(FileNode),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(dir) => &dir.name,
            Node::File(file) => &file.name,
        }
    }
}

/// One directory of the packaged tree.
///
/// `children` preserves visitation order, which is also the order the
/// installer creates entries in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub name: String,
    #[serde(
        serialize_with = "children_as_list",
        deserialize_with = "children_from_list"
    )]
    pub children: IndexMap<String, Node>,
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: IndexMap::new(),
        }
    }

    /// Attach a child, keyed by its name.
    pub fn insert(&mut self, child: Node) {
        self.children.insert(child.name().to_string(), child);
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Visit every file below this directory in visitation order.
    pub fn files(&self) -> Vec<&FileNode> {
        let mut out = Vec::new();
        collect_files(self, &mut out);
        out
    }
}

fn collect_files<'a>(dir: &'a DirectoryNode, out: &mut Vec<&'a FileNode>) {
    for child in dir.children.values() {
        match child {
            Node::Directory(sub) => collect_files(sub, out),
            Node::File(file) => out.push(file),
        }
    }
}

fn children_as_list<S: Serializer>(
    children: &IndexMap<String, Node>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(children.values())
}

fn children_from_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IndexMap<String, Node>, D::Error> {
    let nodes = Vec::<Node>::deserialize(deserializer)?;
    Ok(nodes
        .into_iter()
        .map(|node| (node.name().to_string(), node))
        .collect())
}

/// One file of the packaged tree. The text itself lives in the
/// [`ContentTable`] at index `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    /// 1-based content id.
    pub code: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// ContentTable
// ────────────────────────────────────────────────────────────────────────────

/// Escaped file contents addressed by 1-based id, in visitation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTable {
    entries: Vec<String>,
}

impl ContentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an escaped entry and return the id assigned to it.
    pub fn push(&mut self, escaped: String) -> usize {
        self.entries.push(escaped);
        self.entries.len()
    }

    /// Look up an entry by its 1-based id.
    pub fn get(&self, id: usize) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|idx| self.entries.get(idx))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
