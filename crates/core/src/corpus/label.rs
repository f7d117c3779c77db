use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CurateError;

/// Output directory for background-only clips.
pub const NOISE_CATEGORY: &str = "_noise";
/// Output directory for the catch-all non-target class.
pub const UNKNOWN_CATEGORY: &str = "_unknown";

/// A word class, named after the input subdirectory holding its recordings.
///
/// Always usable as a single path component: non-empty, no separators,
/// not `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WordLabel(String);

impl WordLabel {
    pub fn new(name: impl Into<String>) -> Result<Self, CurateError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("empty name")
        } else if name == "." || name == ".." {
            Some("relative path component")
        } else if name.contains(['/', '\\']) {
            Some("contains a path separator")
        } else if name.contains('\0') {
            Some("contains a NUL byte")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(CurateError::InvalidLabel { label: name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for names that collide with the fixed output categories.
    pub fn is_reserved(&self) -> bool {
        self.0 == NOISE_CATEGORY || self.0 == UNKNOWN_CATEGORY
    }
}

impl fmt::Display for WordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WordLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WordLabel {
    type Error = CurateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WordLabel> for String {
    fn from(label: WordLabel) -> Self {
        label.0
    }
}
