use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Identity of a component signature: the declaring file plus the component name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureKey {
    pub file: PathBuf,
    pub component: String,
}

impl SignatureKey {
    pub fn new(file: impl Into<PathBuf>, component: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            component: component.into(),
        }
    }
}

/// Last-known prop lists, used to compute removed props between two saves.
///
/// Entries are replaced on every observation and never deleted.
pub trait SignatureStore {
    fn get(&self, key: &SignatureKey) -> Option<Vec<String>>;
    fn set(&mut self, key: SignatureKey, props: Vec<String>);
    fn entries(&self) -> Vec<(SignatureKey, Vec<String>)>;
}

/// In-memory store living as long as the host session
#[derive(Debug, Default, Clone)]
pub struct SignatureCache {
    entries: HashMap<SignatureKey, Vec<String>>,
}

impl SignatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries recorded for one declaring file
    pub fn for_file(&self, file: &Path) -> Vec<(String, Vec<String>)> {
        let mut found: Vec<(String, Vec<String>)> = self
            .entries
            .iter()
            .filter(|(key, _)| key.file == file)
            .map(|(key, props)| (key.component.clone(), props.clone()))
            .collect();
        found.sort();
        found
    }
}

impl SignatureStore for SignatureCache {
    fn get(&self, key: &SignatureKey) -> Option<Vec<String>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: SignatureKey, props: Vec<String>) {
        self.entries.insert(key, props);
    }

    fn entries(&self) -> Vec<(SignatureKey, Vec<String>)> {
        let mut all: Vec<(SignatureKey, Vec<String>)> = self
            .entries
            .iter()
            .map(|(key, props)| (key.clone(), props.clone()))
            .collect();
        all.sort();
        all
    }
}
