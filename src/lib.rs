//! Etsin - research dataset discovery back end
//!
//! Builds navigable file trees from catalog records, decides which data
//! affordances a caller gets for a dataset, and recognizes dataset
//! identifiers typed into the search box.

pub mod access;
pub mod catalog;
pub mod config;
pub mod datetime;
pub mod error;
pub mod files;
pub mod logging;
pub mod qvain;
pub mod search;
pub mod web;

pub use access::{
    compute_restrictions, compute_restrictions_at, AccessRestrictions, AccessRights, AccessType,
    PermitStatus,
};
pub use catalog::{CatalogRecord, CatalogSource, InMemoryCatalog, MetaxClient, PermitSource, RemsClient};
pub use config::Config;
pub use error::{EtsinError, Result};
pub use files::{build, build_tree, count_files, Entry, FileEntry, FolderEntry, TreeError, TreeNode};
pub use search::transform;
