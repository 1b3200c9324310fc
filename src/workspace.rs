//! # Host Boundary
//!
//! Everything the synchronization engine needs from its host editor:
//!
//! - **Save trigger**: [`SavedDocument`] handed to `PropSync::handle_save`
//! - **Discovery / read / apply**: the [`Workspace`] trait
//! - **Confirmation**: the [`Prompter`] trait
//!
//! Two workspaces ship with the crate: [`FsWorkspace`] works on files under a
//! root directory, [`MemoryWorkspace`] on in-memory buffers.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SyncOptions;
use crate::discovery::find_source_files;
use crate::edits::{apply_text_edits, fingerprint, WorkspaceEdit};
use crate::error::{SyncError, SyncResult};

/// A document the host just saved
#[derive(Debug, Clone)]
pub struct SavedDocument {
    pub path: PathBuf,
    pub language_id: String,
    pub text: String,
}

impl SavedDocument {
    pub fn new(path: impl Into<PathBuf>, language_id: &str, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language_id: language_id.to_string(),
            text: text.into(),
        }
    }
}

pub trait Workspace {
    /// Candidate source files, dependency directories already excluded
    fn find_files(&self) -> SyncResult<Vec<PathBuf>>;

    /// Directory that discovered paths are relative to; test-file rules only
    /// look at path segments below it
    fn root_dir(&self) -> Option<&Path> {
        None
    }

    fn read(&self, path: &Path) -> SyncResult<String>;

    /// Apply every replacement in `edit` as one unit
    fn apply(&mut self, edit: &WorkspaceEdit) -> SyncResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Apply,
    Cancel,
}

/// A confirmation request: a message plus the labels of its two buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    pub apply_label: String,
    pub cancel_label: String,
}

pub trait Prompter {
    /// Ask the user; `None` means the prompt was dismissed
    fn confirm(&mut self, prompt: &Prompt) -> Option<Choice>;

    /// Surface a completion notice
    fn notify(&mut self, message: &str);
}

/// Compute the new text of every file in `edit` against `read`, verifying
/// fingerprints first. Nothing is written here.
fn stage_edit<F>(edit: &WorkspaceEdit, read: F) -> SyncResult<Vec<(PathBuf, String)>>
where
    F: Fn(&Path) -> SyncResult<String>,
{
    let mut staged = Vec::with_capacity(edit.file_count());
    for (path, file_edit) in edit.files() {
        let current = read(path)?;
        if fingerprint(&current) != file_edit.fingerprint {
            return Err(SyncError::StaleDocument(path.clone()));
        }
        staged.push((path.clone(), apply_text_edits(path, &current, &file_edit.edits)?));
    }
    Ok(staged)
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILESYSTEM WORKSPACE
// ═══════════════════════════════════════════════════════════════════════════════

pub struct FsWorkspace {
    root: PathBuf,
    options: SyncOptions,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>, options: SyncOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

}

impl Workspace for FsWorkspace {
    fn root_dir(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn find_files(&self) -> SyncResult<Vec<PathBuf>> {
        if !self.root.exists() {
            return Err(SyncError::UnknownDocument(self.root.clone()));
        }
        Ok(find_source_files(&self.root, &self.options))
    }

    fn read(&self, path: &Path) -> SyncResult<String> {
        fs::read_to_string(path).map_err(|source| SyncError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every file is verified and rewritten in memory before the first write,
    /// and each write goes through a sibling temp file plus rename.
    fn apply(&mut self, edit: &WorkspaceEdit) -> SyncResult<()> {
        let staged = stage_edit(edit, |path| self.read(path))?;

        for (path, text) in staged {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let tmp = path.with_file_name(format!(".{}.propsync.tmp", file_name));
            fs::write(&tmp, text)?;
            fs::rename(&tmp, &path)?;
            tracing::debug!("[PropSync] Wrote {:?}", path);
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMORY WORKSPACE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory documents keyed by path, for hosts that own their buffers
#[derive(Debug, Default, Clone)]
pub struct MemoryWorkspace {
    documents: BTreeMap<PathBuf, String>,
    options: SyncOptions,
}

impl MemoryWorkspace {
    pub fn new(options: SyncOptions) -> Self {
        Self {
            documents: BTreeMap::new(),
            options,
        }
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.documents.insert(path.into(), text.into());
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.documents.get(path).map(String::as_str)
    }
}

impl Workspace for MemoryWorkspace {
    fn find_files(&self) -> SyncResult<Vec<PathBuf>> {
        Ok(self
            .documents
            .keys()
            .filter(|path| self.options.handles_extension(path))
            .filter(|path| {
                !path.components().any(|c| {
                    c.as_os_str()
                        .to_str()
                        .map(|s| self.options.is_excluded_dir(s))
                        .unwrap_or(false)
                })
            })
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> SyncResult<String> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| SyncError::UnknownDocument(path.to_path_buf()))
    }

    fn apply(&mut self, edit: &WorkspaceEdit) -> SyncResult<()> {
        let staged = stage_edit(edit, |path| self.read(path))?;
        self.documents.extend(staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_workspace_discovery_filters() {
        let mut ws = MemoryWorkspace::new(SyncOptions::default());
        ws.insert("src/App.tsx", "");
        ws.insert("src/site.css", "");
        ws.insert("node_modules/pkg/index.js", "");

        assert_eq!(ws.find_files().unwrap(), vec![PathBuf::from("src/App.tsx")]);
    }

    #[test]
    fn test_memory_apply_is_all_or_nothing() {
        let mut ws = MemoryWorkspace::new(SyncOptions::default());
        ws.insert("a.tsx", "<A />");
        ws.insert("b.tsx", "<B />");

        let mut edit = WorkspaceEdit::new();
        edit.replace(Path::new("a.tsx"), "<A />", 0, 5, "<A x />".to_string());
        edit.replace(Path::new("b.tsx"), "stale text", 0, 5, "<B y />".to_string());

        let err = ws.apply(&edit).unwrap_err();
        assert!(matches!(err, SyncError::StaleDocument(ref p) if p == Path::new("b.tsx")));
        assert_eq!(ws.get(Path::new("a.tsx")), Some("<A />"));
        assert_eq!(ws.get(Path::new("b.tsx")), Some("<B />"));
    }

    #[test]
    fn test_fs_workspace_apply_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("A.tsx");
        let b = dir.path().join("B.tsx");
        fs::write(&a, "<A />").unwrap();
        fs::write(&b, "<B />").unwrap();

        let mut ws = FsWorkspace::new(dir.path(), SyncOptions::default());
        let mut edit = WorkspaceEdit::new();
        edit.replace(&a, "<A />", 2, 2, " x".to_string());
        edit.replace(&b, "<B />", 2, 2, " y".to_string());
        ws.apply(&edit).unwrap();

        assert_eq!(fs::read_to_string(&a).unwrap(), "<A x />");
        assert_eq!(fs::read_to_string(&b).unwrap(), "<B y />");
        assert_eq!(ws.find_files().unwrap().len(), 2);
    }

    #[test]
    fn test_fs_workspace_refuses_stale_plan() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("A.tsx");
        fs::write(&a, "<A />").unwrap();

        let mut edit = WorkspaceEdit::new();
        edit.replace(&a, "<A />", 2, 2, " x".to_string());
        fs::write(&a, "<A done />").unwrap();

        let mut ws = FsWorkspace::new(dir.path(), SyncOptions::default());
        assert!(matches!(ws.apply(&edit), Err(SyncError::StaleDocument(_))));
        assert_eq!(fs::read_to_string(&a).unwrap(), "<A done />");
    }

    #[test]
    fn test_fs_workspace_read_error_names_path() {
        let ws = FsWorkspace::new("/nonexistent-root", SyncOptions::default());
        let err = ws.read(Path::new("/nonexistent-root/A.tsx")).unwrap_err();
        assert!(err.to_string().contains("A.tsx"));
        assert!(ws.find_files().is_err());
    }
}
