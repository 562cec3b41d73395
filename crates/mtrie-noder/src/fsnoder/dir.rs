use std::collections::HashSet;
use std::fmt;

use mtrie_types::{FileMode, NodeHash, ObjectHash};

use crate::error::{NoderError, NoderResult};
use crate::noder::{sort_by_name, Noder, NoderRef};

/// A directory literal.
///
/// The hash covers the sorted `(name, hash)` pairs of the children, so it is
/// independent of the directory's own name and of insertion order. All
/// empty directories share one hash.
#[derive(Clone)]
pub struct Dir {
    name: String,
    children: Vec<NoderRef>,
    hash: NodeHash,
}

impl Dir {
    /// Build a directory. Fails if a child has no name or two children
    /// share a name.
    pub fn new(name: impl Into<String>, mut children: Vec<NoderRef>) -> NoderResult<Self> {
        let name = name.into();

        let mut seen = HashSet::with_capacity(children.len());
        for child in &children {
            if child.name().is_empty() {
                return Err(NoderError::Construction(format!(
                    "directory {name:?} has a child with an empty name"
                )));
            }
            if !seen.insert(child.name().to_string()) {
                return Err(NoderError::Construction(format!(
                    "directory {name:?} has duplicate entry {:?}",
                    child.name()
                )));
            }
        }

        sort_by_name(&mut children);
        let hash = hash_children(&children);
        Ok(Self {
            name,
            children,
            hash,
        })
    }
}

fn hash_children(children: &[NoderRef]) -> NodeHash {
    let mut buf = Vec::new();
    for child in children {
        buf.extend_from_slice(child.name().as_bytes());
        buf.push(0);
        buf.extend_from_slice(child.hash().as_bytes());
    }
    NodeHash::encode(&ObjectHash::from_bytes(&buf), FileMode::Dir)
}

impl Noder for Dir {
    fn hash(&self) -> NodeHash {
        self.hash
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        true
    }

    fn children(&self) -> NoderResult<&[NoderRef]> {
        Ok(&self.children)
    }

    fn num_children(&self) -> NoderResult<usize> {
        Ok(self.children.len())
    }
}

// Renders as `name(child child ...)` with children sorted by name.
impl fmt::Debug for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{child:?}")?;
        }
        write!(f, ")")
    }
}
