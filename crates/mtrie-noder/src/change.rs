//! Change records produced by a structural comparison.

use std::fmt;

use crate::noder::NoderRef;

/// What happened to a path between the two compared trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Present only in the new tree.
    Insert,
    /// Present only in the old tree.
    Delete,
    /// Present in both with different comparison keys.
    Modify,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "Insert"),
            Self::Delete => write!(f, "Delete"),
            Self::Modify => write!(f, "Modify"),
        }
    }
}

/// One change between two trees.
///
/// `from` is the node in the old tree, `to` the node in the new tree; the
/// side that does not exist for the action is `None`.
#[derive(Clone, Debug)]
pub struct Change {
    pub action: Action,
    /// Slash-separated path relative to the compared roots.
    pub path: String,
    pub from: Option<NoderRef>,
    pub to: Option<NoderRef>,
}

/// Ordered list of changes.
pub type Changes = Vec<Change>;

impl Change {
    pub fn insert(path: impl Into<String>, to: NoderRef) -> Self {
        Self {
            action: Action::Insert,
            path: path.into(),
            from: None,
            to: Some(to),
        }
    }

    pub fn delete(path: impl Into<String>, from: NoderRef) -> Self {
        Self {
            action: Action::Delete,
            path: path.into(),
            from: Some(from),
            to: None,
        }
    }

    pub fn modify(path: impl Into<String>, from: NoderRef, to: NoderRef) -> Self {
        Self {
            action: Action::Modify,
            path: path.into(),
            from: Some(from),
            to: Some(to),
        }
    }

    /// The same change with its path placed under `prefix`.
    pub fn rebased(&self, prefix: &str) -> Self {
        let path = if prefix.is_empty() {
            self.path.clone()
        } else if self.path.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}/{}", self.path)
        };
        Self {
            path,
            ..self.clone()
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.action, self.path)
    }
}
