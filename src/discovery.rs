//! Discovery Module
//!
//! Recursively scans a workspace root for source files and classifies test files.

use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SyncOptions;

/// Directory names that mark test code
const TEST_DIRS: [&str; 3] = ["__tests__", "tests", "test"];

/// Check if a path looks like a test file.
///
/// Matches a directory segment `__tests__`, `tests` or `test`, or a file
/// name containing `.test.` or `.spec.`.
pub fn is_test_file(path: &Path) -> bool {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if file_name.contains(".test.") || file_name.contains(".spec.") {
        return true;
    }

    path.parent()
        .map(|dir| {
            dir.components().any(|c| match c {
                Component::Normal(segment) => segment
                    .to_str()
                    .map(|s| TEST_DIRS.contains(&s))
                    .unwrap_or(false),
                _ => false,
            })
        })
        .unwrap_or(false)
}

/// Find all source files under `root` with a configured extension, skipping
/// excluded directories. Sorted so discovery order is deterministic.
pub fn find_source_files(root: &Path, options: &SyncOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root).follow_links(true).into_iter();
    let entries = walker.filter_entry(|entry| {
        entry.depth() == 0
            || !entry.file_type().is_dir()
            || entry
                .file_name()
                .to_str()
                .map(|name| !options.is_excluded_dir(name))
                .unwrap_or(true)
    });

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && options.handles_extension(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => {
                tracing::warn!("[PropSync] Skipping unreadable entry: {}", e);
            }
        }
    }

    files.sort();
    files
}
