//! File and folder entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TreeError;

/// File type label used when the record carries none.
pub const DEFAULT_FILE_TYPE: &str = "file";

/// A reference-data concept such as a use category or file type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Concept URI.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Labels keyed by language code.
    #[serde(default)]
    pub pref_label: BTreeMap<String, String>,
}

impl Concept {
    /// Resolve the label for a language.
    ///
    /// Falls back to English, then Finnish, then any label.
    pub fn label(&self, language: &str) -> Option<&str> {
        [language, "en", "fi"]
            .iter()
            .find_map(|lang| self.pref_label.get(*lang))
            .or_else(|| self.pref_label.values().next())
            .map(String::as_str)
    }
}

/// Access URL of a file or directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessUrl {
    /// The URL.
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Storage details of a file as embedded in a dataset record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDetails {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub byte_size: Option<u64>,
}

/// Storage details of a directory as embedded in a dataset record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryDetails {
    #[serde(default)]
    pub directory_path: Option<String>,
    #[serde(default)]
    pub directory_name: Option<String>,
    #[serde(default)]
    pub file_count: Option<u64>,
    #[serde(default)]
    pub byte_size: Option<u64>,
}

/// A file record from the catalog.
///
/// Dataset records nest the storage fields under `details`; the directory
/// API returns them at the top level. Both shapes deserialize into this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub use_category: Option<Concept>,
    #[serde(default)]
    pub file_type: Option<Concept>,
    #[serde(default, rename = "type")]
    pub type_concept: Option<Concept>,
    #[serde(default)]
    pub access_url: Option<AccessUrl>,
    #[serde(default)]
    pub details: Option<FileDetails>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub byte_size: Option<u64>,
}

impl FileRecord {
    /// Path as stored in the catalog, with its leading slash.
    pub fn path(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.file_path.as_deref())
            .or(self.file_path.as_deref())
    }

    /// File name used for sorting listings.
    pub fn name(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.file_name.as_deref())
            .or(self.file_name.as_deref())
    }

    fn size(&self) -> u64 {
        self.details
            .as_ref()
            .and_then(|d| d.byte_size)
            .or(self.byte_size)
            .unwrap_or(0)
    }

    /// Convert into a tree entry, stripping the leading slash of the path.
    pub fn into_entry(self, language: &str) -> Result<Entry, TreeError> {
        let path = self
            .path()
            .map(|p| strip_leading_slash(p).to_string())
            .ok_or_else(|| TreeError::MissingPath {
                identifier: self.identifier.clone(),
            })?;

        let file_type = self
            .type_concept
            .as_ref()
            .or(self.file_type.as_ref())
            .and_then(|c| c.label(language))
            .unwrap_or(DEFAULT_FILE_TYPE)
            .to_string();
        let byte_size = self.size();

        Ok(Entry::File(FileEntry {
            path,
            file_type,
            title: self.title,
            use_category: self
                .use_category
                .as_ref()
                .and_then(|c| c.label(language))
                .map(str::to_string),
            byte_size,
            identifier: self.identifier,
            download_url: self.access_url.and_then(|u| u.identifier),
            description: self.description,
        }))
    }
}

/// A directory record from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub use_category: Option<Concept>,
    #[serde(default)]
    pub access_url: Option<AccessUrl>,
    #[serde(default)]
    pub details: Option<DirectoryDetails>,
    #[serde(default)]
    pub directory_path: Option<String>,
    #[serde(default)]
    pub directory_name: Option<String>,
    #[serde(default)]
    pub file_count: Option<u64>,
    #[serde(default)]
    pub byte_size: Option<u64>,
}

impl DirectoryRecord {
    /// Path as stored in the catalog, with its leading slash.
    pub fn path(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.directory_path.as_deref())
            .or(self.directory_path.as_deref())
    }

    /// Directory name used for sorting listings.
    pub fn name(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.directory_name.as_deref())
            .or(self.directory_name.as_deref())
    }

    /// Convert into a tree entry, stripping the leading slash of the path.
    pub fn into_entry(self, language: &str) -> Result<Entry, TreeError> {
        let path = self
            .path()
            .map(|p| strip_leading_slash(p).to_string())
            .ok_or_else(|| TreeError::MissingPath {
                identifier: self.identifier.clone(),
            })?;

        let details = self.details.as_ref();
        let file_count = details.and_then(|d| d.file_count).or(self.file_count);
        let byte_size = details.and_then(|d| d.byte_size).or(self.byte_size);

        Ok(Entry::Directory(FolderEntry {
            path,
            file_count,
            byte_size,
            title: self.title,
            use_category: self
                .use_category
                .as_ref()
                .and_then(|c| c.label(language))
                .map(str::to_string),
            identifier: self.identifier,
            download_url: self.access_url.and_then(|u| u.identifier),
            description: self.description,
        }))
    }
}

/// One file, ready for tree insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// `/`-separated path without a leading slash.
    pub path: String,
    /// File type label, or `"file"`.
    #[serde(rename = "type")]
    pub file_type: String,
    pub title: Option<String>,
    pub use_category: Option<String>,
    pub byte_size: u64,
    pub identifier: String,
    pub download_url: Option<String>,
    pub description: Option<String>,
}

/// One directory, ready for tree insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    /// `/`-separated path without a leading slash.
    pub path: String,
    /// Aggregate descendant file count reported by the catalog.
    ///
    /// Used verbatim: the catalog may return only part of the subtree.
    pub file_count: Option<u64>,
    pub byte_size: Option<u64>,
    pub title: Option<String>,
    pub use_category: Option<String>,
    pub identifier: String,
    pub download_url: Option<String>,
    pub description: Option<String>,
}

/// A file or a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    File(FileEntry),
    Directory(FolderEntry),
}

impl Entry {
    /// The entry path (no leading slash).
    pub fn path(&self) -> &str {
        match self {
            Entry::File(f) => &f.path,
            Entry::Directory(d) => &d.path,
        }
    }

    /// The entry identifier.
    pub fn identifier(&self) -> &str {
        match self {
            Entry::File(f) => &f.identifier,
            Entry::Directory(d) => &d.identifier,
        }
    }

    /// Whether this is a directory entry.
    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }
}

/// Remove a single leading `/` from a catalog path.
///
/// Every path must pass through here before tree insertion; the tree builder
/// itself rejects paths that still start with a slash.
pub fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Combine file and directory records into one entry list.
///
/// Files come first, then directories, each in their given order.
pub fn combine(
    files: Vec<FileRecord>,
    directories: Vec<DirectoryRecord>,
    language: &str,
) -> Result<Vec<Entry>, TreeError> {
    let mut entries = Vec::with_capacity(files.len() + directories.len());
    for file in files {
        entries.push(file.into_entry(language)?);
    }
    for directory in directories {
        entries.push(directory.into_entry(language)?);
    }
    Ok(entries)
}
