//! Synchronization options
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields the stock behavior: React/TypeScript sources, `node_modules`
//! excluded, test files never edited.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SyncResult;

/// Attribute value inserted for props a call site is missing.
pub const DEFAULT_PLACEHOLDER: &str = "{/* TODO: completar */}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncOptions {
    /// Language ids whose saves trigger a sync cycle
    pub language_ids: Vec<String>,
    /// File extensions (without dot) considered during discovery
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub excluded_dirs: Vec<String>,
    /// Value written for a missing prop, including its braces
    pub placeholder: String,
    /// Exclude test files from edit targets and definition lookup
    pub skip_test_files: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            language_ids: ["javascriptreact", "typescriptreact", "javascript", "typescript"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extensions: ["tsx", "jsx", "ts", "js"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_dirs: vec!["node_modules".to_string()],
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            skip_test_files: true,
        }
    }
}

impl SyncOptions {
    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file
    pub fn load(path: &Path) -> SyncResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn handles_language(&self, language_id: &str) -> bool {
        self.language_ids.iter().any(|id| id == language_id)
    }

    pub fn handles_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }
}
