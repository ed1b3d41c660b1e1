//! Validated world names.

use std::fmt;

use crate::error::StorageError;

/// Longest accepted world name, in characters.
pub const MAX_WORLD_NAME_LEN: usize = 64;

/// A world name that is safe to use as a path component.
///
/// Non-empty, at most [`MAX_WORLD_NAME_LEN`] characters, ASCII letters, digits
/// and `_` only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorldName(String);

impl WorldName {
    pub fn new(name: impl Into<String>) -> Result<Self, StorageError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.len() <= MAX_WORLD_NAME_LEN
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(Self(name))
        } else {
            Err(StorageError::InvalidWorldName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WorldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_alphanumerics_and_underscore() {
        assert_eq!(WorldName::new("My_World_2").unwrap().as_str(), "My_World_2");
        assert!(WorldName::new("a".repeat(MAX_WORLD_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_rejects_bad_names() {
        for bad in ["", "with space", "../escape", "dash-name", "ünïcode", "a/b"] {
            assert!(
                matches!(WorldName::new(bad), Err(StorageError::InvalidWorldName(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(WorldName::new("a".repeat(MAX_WORLD_NAME_LEN + 1)).is_err());
    }
}
