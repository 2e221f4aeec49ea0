//! Directory tree construction.
//!
//! The catalog hands out files and folders as flat lists of paths. The
//! builder walks each path, creating synthetic directories for segments that
//! have no explicit folder record, and attaches the entry at its last
//! segment. A tree is never patched in place: every fetch builds a new one.

use std::collections::HashMap;

use serde::Serialize;

use super::entry::{Entry, FileEntry, FolderEntry};
use super::TreeError;

/// A node of the file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Last path segment.
    pub name: String,
    /// Full path from the tree root, without a leading slash.
    pub path: String,
    /// File or directory payload.
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    File { file: FileEntry },
    Directory(DirectoryNode),
}

/// A directory and its children in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryNode {
    /// Folder metadata, `None` for synthetic directories.
    pub folder: Option<FolderEntry>,
    /// Child nodes.
    pub children: Vec<TreeNode>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl DirectoryNode {
    /// Whether this directory was implied by a descendant path only.
    pub fn is_synthetic(&self) -> bool {
        self.folder.is_none()
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.index.get(name).map(|&i| &self.children[i])
    }

    fn push(&mut self, node: TreeNode) -> usize {
        let position = self.children.len();
        self.index.insert(node.name.clone(), position);
        self.children.push(node);
        position
    }

    /// Walk into the child directory `name`, creating a synthetic one if needed.
    fn descend(&mut self, name: &str, path: &str) -> Result<&mut DirectoryNode, TreeError> {
        let position = match self.index.get(name).copied() {
            Some(i) => i,
            None => self.push(TreeNode::directory(name, path, None)),
        };

        match &mut self.children[position].kind {
            NodeKind::Directory(dir) => Ok(dir),
            NodeKind::File { .. } => Err(TreeError::KindConflict {
                path: path.to_string(),
            }),
        }
    }

    /// Attach an entry as the child `name`.
    fn place(&mut self, name: &str, entry: Entry) -> Result<(), TreeError> {
        let Some(position) = self.index.get(name).copied() else {
            let path = entry.path().to_string();
            let node = match entry {
                Entry::File(file) => TreeNode {
                    name: name.to_string(),
                    path,
                    kind: NodeKind::File { file },
                },
                Entry::Directory(folder) => TreeNode::directory(name, &path, Some(folder)),
            };
            self.push(node);
            return Ok(());
        };

        let existing = &mut self.children[position];
        match (&mut existing.kind, entry) {
            (NodeKind::File { file: current }, Entry::File(file)) => {
                tracing::debug!(path = %existing.path, "Duplicate file entry, keeping the later one");
                *current = file;
                Ok(())
            }
            (NodeKind::Directory(dir), Entry::Directory(folder)) => {
                if dir.folder.is_some() {
                    tracing::debug!(path = %existing.path, "Duplicate folder entry, keeping the later one");
                }
                dir.folder = Some(folder);
                Ok(())
            }
            _ => Err(TreeError::KindConflict {
                path: existing.path.clone(),
            }),
        }
    }
}

impl TreeNode {
    fn directory(name: &str, path: &str, folder: Option<FolderEntry>) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::Directory(DirectoryNode {
                folder,
                ..Default::default()
            }),
        }
    }

    /// Whether this node is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    /// Identifier of the underlying entry, `None` for synthetic directories.
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { file } => Some(&file.identifier),
            NodeKind::Directory(dir) => dir.folder.as_ref().map(|f| f.identifier.as_str()),
        }
    }

    /// Children of a directory node; files have none.
    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::File { .. } => &[],
            NodeKind::Directory(dir) => dir.children.as_slice(),
        }
    }

    /// Consume the node and return its children.
    pub fn into_children(self) -> Vec<TreeNode> {
        match self.kind {
            NodeKind::File { .. } => Vec::new(),
            NodeKind::Directory(dir) => dir.children,
        }
    }

    fn as_directory_mut(&mut self) -> Option<&mut DirectoryNode> {
        match &mut self.kind {
            NodeKind::Directory(dir) => Some(dir),
            NodeKind::File { .. } => None,
        }
    }
}

/// Build a tree rooted at a synthetic directory named `""`.
///
/// Entry paths must not start with `/`: strip it with
/// [`strip_leading_slash`](super::strip_leading_slash) (the record
/// conversions do this). A path with an empty segment, including one that
/// still has its leading slash, is rejected.
pub fn build_tree<I>(entries: I) -> Result<TreeNode, TreeError>
where
    I: IntoIterator<Item = Entry>,
{
    let mut root = TreeNode::directory("", "", None);
    for entry in entries {
        if let Some(dir) = root.as_directory_mut() {
            insert(dir, entry)?;
        }
    }
    Ok(root)
}

/// Build a tree and return the root's children.
pub fn build<I>(entries: I) -> Result<Vec<TreeNode>, TreeError>
where
    I: IntoIterator<Item = Entry>,
{
    Ok(build_tree(entries)?.into_children())
}

fn insert(root: &mut DirectoryNode, entry: Entry) -> Result<(), TreeError> {
    let path = entry.path().to_string();
    if path.is_empty() {
        return Err(TreeError::EmptyPath {
            identifier: entry.identifier().to_string(),
        });
    }

    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TreeError::EmptySegment { path });
    }
    let Some((last, ancestors)) = segments.split_last() else {
        return Err(TreeError::EmptySegment { path });
    };

    let mut current = root;
    let mut current_path = String::with_capacity(path.len());
    for segment in ancestors {
        if !current_path.is_empty() {
            current_path.push('/');
        }
        current_path.push_str(segment);
        current = current.descend(segment, &current_path)?;
    }
    current.place(last, entry)
}

/// Count the files of a dataset from its top-level nodes.
///
/// A folder with a catalog-reported `file_count` contributes that number
/// verbatim. Any other directory contributes the count of its children, and
/// a file counts as one. An empty list is an error.
pub fn count_files(nodes: &[TreeNode]) -> Result<u64, TreeError> {
    if nodes.is_empty() {
        return Err(TreeError::EmptyTree);
    }
    Ok(nodes.iter().map(node_file_count).sum())
}

fn node_file_count(node: &TreeNode) -> u64 {
    match &node.kind {
        NodeKind::File { .. } => 1,
        NodeKind::Directory(dir) => match dir.folder.as_ref().and_then(|f| f.file_count) {
            Some(count) => count,
            None => dir.children.iter().map(node_file_count).sum(),
        },
    }
}

/// Skip the chain of lone synthetic directories at the top of a tree.
///
/// Folder listings carry full paths, so their tree starts with one synthetic
/// directory per ancestor of the listed folder. This returns the nodes at the
/// first level that holds more than a single synthetic directory.
pub fn collapse_synthetic(mut nodes: Vec<TreeNode>) -> Vec<TreeNode> {
    loop {
        let lone_synthetic = matches!(
            nodes.as_slice(),
            [TreeNode { kind: NodeKind::Directory(dir), .. }] if dir.is_synthetic()
        );
        if !lone_synthetic {
            return nodes;
        }
        nodes = match nodes.pop() {
            Some(node) => node.into_children(),
            None => return Vec::new(),
        };
    }
}

/// Flatten nodes depth-first into `(path, is_directory)` pairs.
pub fn flatten(nodes: &[TreeNode]) -> Vec<(String, bool)> {
    let mut out = Vec::new();
    let mut stack: Vec<&TreeNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push((node.path.clone(), node.is_directory()));
        stack.extend(node.children().iter().rev());
    }
    out
}
