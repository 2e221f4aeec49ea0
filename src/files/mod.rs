//! Dataset file and folder handling.
//!
//! This module turns the flat file and directory records the catalog returns
//! into a nested tree for breadcrumb navigation and folder drill-down:
//! - Record types for both Metax response shapes
//! - A tagged `Entry` union with the leading `/` already stripped
//! - The directory tree builder and aggregate file count
//! - Sorting and truncation of directory listings

mod entry;
mod listing;
mod tree;

pub use entry::{
    combine, strip_leading_slash, AccessUrl, Concept, DirectoryDetails, DirectoryRecord, Entry,
    FileDetails, FileEntry, FileRecord, FolderEntry, DEFAULT_FILE_TYPE,
};
pub use listing::DirectoryListing;
pub use tree::{
    build, build_tree, collapse_synthetic, count_files, flatten, DirectoryNode, NodeKind, TreeNode,
};

use thiserror::Error;

/// Maximum number of files or directories returned for one folder.
pub const TOTAL_ITEM_LIMIT: usize = 1000;

/// Errors raised while converting records or building a file tree.
///
/// All of these indicate a broken contract with the caller or the catalog;
/// entries are never dropped silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The entry has an empty path.
    #[error("entry {identifier} has an empty path")]
    EmptyPath { identifier: String },

    /// The path contains an empty segment.
    #[error("path '{path}' contains an empty segment (was the leading '/' stripped?)")]
    EmptySegment { path: String },

    /// The same path is claimed by a file and a directory.
    #[error("path '{path}' is used both as a file and as a directory")]
    KindConflict { path: String },

    /// A catalog record carries no path at all.
    #[error("record {identifier} has no path")]
    MissingPath { identifier: String },

    /// `count_files` was called on an empty list.
    #[error("cannot count files of an empty tree")]
    EmptyTree,
}
