//! Edits Module
//!
//! Accumulates text replacements across files into one workspace edit that a
//! host applies as a single unit. Each file remembers a fingerprint of the text
//! its ranges were computed against, so a host can refuse to apply a plan to a
//! document that changed in the meantime.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{SyncError, SyncResult};

/// SHA-256 of a document's text, hex encoded
pub fn fingerprint(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Replace the byte range `start..end` with `new_text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEdit {
    pub fingerprint: String,
    pub edits: Vec<TextEdit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdit {
    files: BTreeMap<PathBuf, FileEdit>,
}

impl WorkspaceEdit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a replacement in `path`, whose current text is `source`
    pub fn replace(&mut self, path: &Path, source: &str, start: usize, end: usize, new_text: String) {
        let entry = self
            .files
            .entry(path.to_path_buf())
            .or_insert_with(|| FileEdit {
                fingerprint: fingerprint(source),
                edits: Vec::new(),
            });
        entry.edits.push(TextEdit {
            start,
            end,
            new_text,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(|f| f.edits.is_empty())
    }

    /// Total number of replacements across all files
    pub fn len(&self) -> usize {
        self.files.values().map(|f| f.edits.len()).sum()
    }

    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &FileEdit)> {
        self.files.iter()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Apply a file's replacements, back to front so earlier offsets stay valid.
///
/// Ranges must lie on char boundaries inside `source` and must not overlap.
pub fn apply_text_edits(path: &Path, source: &str, edits: &[TextEdit]) -> SyncResult<String> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut result = source.to_string();
    let mut limit = source.len();

    for edit in ordered {
        let in_bounds = edit.start <= edit.end
            && edit.end <= source.len()
            && source.is_char_boundary(edit.start)
            && source.is_char_boundary(edit.end);
        if !in_bounds {
            return Err(SyncError::InvalidRange {
                path: path.to_path_buf(),
                start: edit.start,
                end: edit.end,
                len: source.len(),
            });
        }
        if edit.end > limit {
            return Err(SyncError::OverlappingEdits(path.to_path_buf()));
        }

        result.replace_range(edit.start..edit.end, &edit.new_text);
        limit = edit.start;
    }

    Ok(result)
}

// ═══════════════════════════════════════════════════════════════════════════════
// POSITIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Zero-based line and UTF-16 column, the unit editor hosts address text in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Byte offset to line/column translation for one document
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Position of a byte offset; offsets past the end clamp to the end
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let character: usize = self.source[line_start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();

        Position {
            line: line as u32,
            character: character as u32,
        }
    }
}
