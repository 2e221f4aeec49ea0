//! Contents of one catalog folder.

use serde::{Deserialize, Serialize};

use super::entry::{combine, DirectoryRecord, Entry, FileRecord};
use super::TreeError;

/// Direct children of a folder as returned by the catalog directory API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    #[serde(default)]
    pub directories: Vec<DirectoryRecord>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl DirectoryListing {
    /// Sort directories and files by name and cap each list at `limit` items.
    pub fn sort_and_limit(&mut self, limit: usize) {
        self.directories.sort_by(|a, b| a.name().cmp(&b.name()));
        self.files.sort_by(|a, b| a.name().cmp(&b.name()));

        if self.directories.len() > limit || self.files.len() > limit {
            tracing::debug!(
                directories = self.directories.len(),
                files = self.files.len(),
                limit,
                "Truncating folder listing"
            );
        }
        self.directories.truncate(limit);
        self.files.truncate(limit);
    }

    /// Drop the access URLs of every child.
    pub fn hide_access_urls(&mut self) {
        for file in &mut self.files {
            file.access_url = None;
        }
        for directory in &mut self.directories {
            directory.access_url = None;
        }
    }

    /// Convert into tree entries, files first.
    pub fn into_entries(self, language: &str) -> Result<Vec<Entry>, TreeError> {
        combine(self.files, self.directories, language)
    }
}
