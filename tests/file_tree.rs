//! File tree integration tests.
//!
//! Builds trees from catalog-shaped records and checks the structural
//! guarantees navigation relies on.

use std::collections::HashSet;

use serde_json::json;

use etsin::catalog::CatalogRecord;
use etsin::files::{
    build, build_tree, count_files, flatten, Entry, FileEntry, FolderEntry, NodeKind, TreeError,
    TreeNode,
};

fn file(path: &str) -> Entry {
    Entry::File(FileEntry {
        path: path.to_string(),
        file_type: "file".to_string(),
        title: None,
        use_category: None,
        byte_size: 0,
        identifier: format!("f:{path}"),
        download_url: None,
        description: None,
    })
}

fn folder(path: &str, file_count: Option<u64>) -> Entry {
    Entry::Directory(FolderEntry {
        path: path.to_string(),
        file_count,
        byte_size: None,
        title: None,
        use_category: None,
        identifier: format!("d:{path}"),
        download_url: None,
        description: None,
    })
}

/// Deterministic set of paths up to four levels deep.
fn generated_paths() -> Vec<String> {
    let mut paths = Vec::new();
    for a in 0..4 {
        for b in 0..3 {
            for c in 0..(a + b) {
                paths.push(format!("top{a}/mid{b}/leaf{c}.dat"));
            }
            if a % 2 == 0 {
                paths.push(format!("top{a}/mid{b}/deep/x{b}.bin"));
            }
        }
        paths.push(format!("top{a}.txt"));
    }
    paths
}

fn walk<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a TreeNode>) {
    for node in nodes {
        out.push(node);
        walk(node.children(), out);
    }
}

#[test]
fn test_every_entry_appears_exactly_once() {
    let paths = generated_paths();
    let tree = build(paths.iter().map(|p| file(p))).unwrap();

    let files: Vec<String> = flatten(&tree)
        .into_iter()
        .filter(|(_, is_dir)| !is_dir)
        .map(|(path, _)| path)
        .collect();
    assert_eq!(files.len(), paths.len());
    assert_eq!(
        files.iter().collect::<HashSet<_>>(),
        paths.iter().collect::<HashSet<_>>()
    );
}

#[test]
fn test_paths_are_consistent_with_parents() {
    let tree = build(generated_paths().iter().map(|p| file(p))).unwrap();

    let mut nodes = Vec::new();
    walk(&tree, &mut nodes);
    for node in nodes {
        assert!(!node.path.starts_with('/'));
        assert!(node.path.ends_with(&node.name));
        for child in node.children() {
            assert_eq!(child.path, format!("{}/{}", node.path, child.name));
        }
    }
}

#[test]
fn test_sibling_names_are_unique() {
    let mut paths = generated_paths();
    paths.extend(generated_paths());
    let tree = build(paths.iter().map(|p| file(p))).unwrap();

    let mut nodes = Vec::new();
    walk(&tree, &mut nodes);
    for node in nodes {
        let names: Vec<&str> = node.children().iter().map(|c| c.name.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len(), "duplicate child under {}", node.path);
    }
}

#[test]
fn test_entry_order_does_not_change_shape() {
    let paths = generated_paths();
    let forward = build(paths.iter().map(|p| file(p))).unwrap();
    let backward = build(paths.iter().rev().map(|p| file(p))).unwrap();

    let mut a: Vec<_> = flatten(&forward);
    let mut b: Vec<_> = flatten(&backward);
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn test_folder_record_after_implied_directory() {
    let tree = build([file("a/b/c.txt"), folder("a/b", Some(7))]).unwrap();

    let b = &tree[0].children()[0];
    match &b.kind {
        NodeKind::Directory(dir) => {
            assert!(!dir.is_synthetic());
            assert_eq!(dir.children.len(), 1);
        }
        NodeKind::File { .. } => panic!("Expected a directory"),
    }
    assert_eq!(b.identifier(), Some("d:a/b"));
}

#[test]
fn test_root_is_synthetic() {
    let root = build_tree([file("x.txt")]).unwrap();
    assert_eq!(root.name, "");
    assert_eq!(root.identifier(), None);
    assert_eq!(root.children().len(), 1);
}

#[test]
fn test_leading_slash_is_rejected() {
    let err = build([file("/a/b.txt")]).unwrap_err();
    assert!(matches!(err, TreeError::EmptySegment { .. }));
}

#[test]
fn test_count_files_mixed_top_level() {
    let tree = build([
        file("readme.txt"),
        folder("data", Some(40)),
        folder("empty", Some(0)),
        file("scripts/run.sh"),
    ])
    .unwrap();

    // readme + data(40) + empty(0) + scripts holding one file
    assert_eq!(count_files(&tree), Ok(42));
    assert_eq!(count_files(&[]), Err(TreeError::EmptyTree));
}

#[test]
fn test_count_files_matches_entry_count_without_folders() {
    let paths = generated_paths();
    let tree = build(paths.iter().map(|p| file(p))).unwrap();
    assert_eq!(count_files(&tree), Ok(paths.len() as u64));
}

#[test]
fn test_record_to_tree() {
    let record = CatalogRecord::new(json!({
        "identifier": "cr1",
        "research_dataset": {
            "files": [
                {
                    "identifier": "f1",
                    "file_type": { "pref_label": { "en": "Text", "fi": "Teksti" } },
                    "details": { "file_path": "/notes/a.txt", "file_name": "a.txt", "byte_size": 3 }
                }
            ],
            "directories": [
                { "identifier": "d1", "details": { "directory_path": "/notes", "directory_name": "notes", "file_count": 1 } }
            ]
        }
    }));

    let tree = build(record.entries("fi").unwrap()).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].identifier(), Some("d1"));

    match &tree[0].children()[0].kind {
        NodeKind::File { file } => {
            assert_eq!(file.file_type, "Teksti");
            assert_eq!(file.byte_size, 3);
        }
        NodeKind::Directory(_) => panic!("Expected a file"),
    }
    assert_eq!(count_files(&tree), Ok(1));
}
