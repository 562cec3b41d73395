//! Configuration for filesystem nodes.

use std::collections::BTreeMap;

use mtrie_types::ObjectHash;
use serde::{Deserialize, Serialize};

/// How a working directory is presented for comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsOptions {
    /// Submodule paths, relative to the root and slash-separated, mapped to
    /// their pinned commit hash. A mapped entry is a leaf keyed by the pin;
    /// its content on disk is never read.
    pub submodules: BTreeMap<String, ObjectHash>,
    /// Entry names skipped at every level.
    pub ignore: Vec<String>,
    /// Drop entries that disappear between listing and hashing instead of
    /// failing the listing.
    pub tolerate_vanished: bool,
}

impl Default for FsOptions {
    fn default() -> Self {
        Self {
            submodules: BTreeMap::new(),
            ignore: vec![".git".to_string()],
            tolerate_vanished: false,
        }
    }
}

impl FsOptions {
    pub fn with_submodule(mut self, path: impl Into<String>, pin: ObjectHash) -> Self {
        self.submodules.insert(path.into(), pin);
        self
    }

    pub fn tolerate_vanished(mut self, tolerate: bool) -> Self {
        self.tolerate_vanished = tolerate;
        self
    }

    pub(crate) fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|i| i == name)
    }
}
