//! Object identity and kind.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Unique identifier of an object in the host store.
pub type ObjectId = u64;

/// The kind of a node in the object tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Structural container without a class or fields.
    Folder,
    /// Regular object of some class.
    Object,
    /// Variant of an object, sharing the parent's class.
    Variant,
}

impl ObjectKind {
    /// Get the string name for this kind, as written to the `type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Object => "object",
            Self::Variant => "variant",
        }
    }

    /// Check if this kind is a folder.
    #[inline]
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder)
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(Self::Folder),
            "object" => Ok(Self::Object),
            "variant" => Ok(Self::Variant),
            other => Err(Error::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
