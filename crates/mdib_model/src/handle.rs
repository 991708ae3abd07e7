//! Handle type identifying descriptors and multi-states.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique string identity of a descriptor or of a single multi-state.
///
/// Handles are assigned by the device model, never generated here. The same
/// type serves both namespaces; uniqueness within each namespace is enforced
/// by the registry, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(String);

impl Handle {
    /// Creates a handle from anything string-like.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(handle: &str) -> Self {
        Self(handle.to_owned())
    }
}

impl From<String> for Handle {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Handle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Handle {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Handle {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn display_is_raw_string() {
        let h = Handle::from("MDS_0");
        assert_eq!(format!("{h}"), "MDS_0");
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Handle::from("VMD_0"), 1u32);
        assert_eq!(map.get("VMD_0"), Some(&1));
        assert_eq!(map.get("VMD_1"), None);
    }

    #[test]
    fn compares_against_str() {
        assert_eq!(Handle::from("CHANNEL_0"), *"CHANNEL_0");
        assert_eq!(Handle::from("CHANNEL_0"), "CHANNEL_0");
    }
}
