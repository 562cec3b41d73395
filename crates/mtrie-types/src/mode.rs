use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Kind and permission bits of a tree entry.
///
/// The set is fixed; each variant has a canonical octal value and a
/// canonical 4-byte encoding used inside comparison keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileMode {
    /// No mode. Never valid for a stored entry.
    Empty,
    /// Subtree / directory (0o040000).
    Dir,
    /// Normal file (0o100644).
    Regular,
    /// Group-writable regular file (0o100664). Historical alias of
    /// [`FileMode::Regular`] found in old trees.
    Deprecated,
    /// Executable file (0o100755).
    Executable,
    /// Symbolic link (0o120000).
    Symlink,
    /// Link to a commit in an embedded repository (0o160000).
    Submodule,
}

impl FileMode {
    /// Octal mode value.
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Dir => 0o040000,
            Self::Regular => 0o100644,
            Self::Deprecated => 0o100664,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Submodule => 0o160000,
        }
    }

    /// Parse from an octal mode value.
    pub fn from_mode_bits(bits: u32) -> Result<Self, TypeError> {
        match bits {
            0 => Ok(Self::Empty),
            0o040000 => Ok(Self::Dir),
            0o100644 => Ok(Self::Regular),
            0o100664 => Ok(Self::Deprecated),
            0o100755 => Ok(Self::Executable),
            0o120000 => Ok(Self::Symlink),
            0o160000 => Ok(Self::Submodule),
            other => Err(TypeError::MalformedMode(other)),
        }
    }

    /// Canonical 4-byte encoding (little-endian mode bits).
    pub fn to_bytes(&self) -> [u8; 4] {
        self.mode_bits().to_le_bytes()
    }

    /// Returns `true` for modes whose entries point at blob content.
    pub fn is_file(&self) -> bool {
        matches!(
            self,
            Self::Regular | Self::Deprecated | Self::Executable | Self::Symlink
        )
    }

    /// Returns `true` for the directory mode.
    pub fn is_dir(&self) -> bool {
        *self == Self::Dir
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:07o}", self.mode_bits())
    }
}
