use std::fmt;
use std::sync::Arc;

use mtrie_types::NodeHash;

use crate::error::NoderResult;

/// Shared handle to a node.
///
/// Nodes are shared between the cache that built them and every comparison
/// currently looking at them.
pub type NoderRef = Arc<dyn Noder>;

/// The children of a non-directory. Returned instead of an `Option` so
/// callers never branch on absence.
pub const NO_CHILDREN: &[NoderRef] = &[];

/// A node of a tree taking part in structural comparison.
///
/// Every attribute is stable once computed: callers may memoize on node
/// identity or on [`Noder::hash`].
pub trait Noder: fmt::Debug + Send + Sync {
    /// The 24-byte comparison key. Equal keys mean identical subtrees.
    fn hash(&self) -> NodeHash;

    /// Entry name. Empty only for a root.
    fn name(&self) -> &str;

    /// Whether this node can have children.
    fn is_dir(&self) -> bool;

    /// Excludes the node from comparison while keeping it listed by its parent.
    fn skip(&self) -> bool {
        false
    }

    /// Direct children. Non-directories return [`NO_CHILDREN`].
    ///
    /// The first successful call materializes the children; later calls
    /// return the same slice without touching the underlying source.
    fn children(&self) -> NoderResult<&[NoderRef]>;

    /// Number of direct children.
    fn num_children(&self) -> NoderResult<usize>;
}

/// Sort nodes by name, the order in which comparisons visit siblings.
pub fn sort_by_name(nodes: &mut [NoderRef]) {
    nodes.sort_by(|a, b| a.name().cmp(b.name()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsnoder::{Dir, File};

    #[test]
    fn no_children_is_empty() {
        assert!(NO_CHILDREN.is_empty());
    }

    #[test]
    fn skip_defaults_to_false() {
        let f = File::new("a", "1").unwrap();
        assert!(!f.skip());
    }

    #[test]
    fn sort_by_name_orders_siblings() {
        let mut nodes: Vec<NoderRef> = vec![
            Arc::new(File::new("c", "3").unwrap()),
            Arc::new(Dir::new("a", vec![]).unwrap()),
            Arc::new(File::new("b", "2").unwrap()),
        ];
        sort_by_name(&mut nodes);
        let names: Vec<&str> = nodes.iter().map(|n| n.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
