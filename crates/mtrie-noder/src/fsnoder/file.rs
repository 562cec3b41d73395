use std::fmt;

use mtrie_types::{FileMode, NodeHash, ObjectHash};

use crate::error::{NoderError, NoderResult};
use crate::noder::{Noder, NoderRef, NO_CHILDREN};

/// A file literal. Its hash depends only on its contents.
#[derive(Clone)]
pub struct File {
    name: String,
    contents: Vec<u8>,
    hash: NodeHash,
}

impl File {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> NoderResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(NoderError::Construction(
                "files cannot have empty names".to_string(),
            ));
        }
        let contents = contents.into();
        let hash = NodeHash::encode(&ObjectHash::from_bytes(&contents), FileMode::Regular);
        Ok(Self {
            name,
            contents,
            hash,
        })
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

impl Noder for File {
    fn hash(&self) -> NodeHash {
        self.hash
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        false
    }

    fn children(&self) -> NoderResult<&[NoderRef]> {
        Ok(NO_CHILDREN)
    }

    fn num_children(&self) -> NoderResult<usize> {
        Ok(0)
    }
}

// Renders as `name<contents>`.
impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name, String::from_utf8_lossy(&self.contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(File::new("", "x"), Err(NoderError::Construction(_))));
    }

    #[test]
    fn hash_ignores_name() {
        let a = File::new("a", "1").unwrap();
        let b = File::new("b", "1").unwrap();
        assert_eq!(a.hash(), b.hash());
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn hash_depends_on_contents() {
        let a1 = File::new("a", "1").unwrap();
        let a2 = File::new("a", "2").unwrap();
        assert_ne!(a1.hash(), a2.hash());
    }

    #[test]
    fn files_have_no_children() {
        let f = File::new("a", "1").unwrap();
        assert!(!f.is_dir());
        assert!(f.children().unwrap().is_empty());
        assert_eq!(f.num_children().unwrap(), 0);
        assert_eq!(f.contents(), b"1");
    }

    #[test]
    fn renders_name_and_contents() {
        assert_eq!(format!("{:?}", File::new("a", "1").unwrap()), "a<1>");
        assert_eq!(format!("{:?}", File::new("e", "").unwrap()), "e<>");
    }
}
