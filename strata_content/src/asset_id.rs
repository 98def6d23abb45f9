use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};
use strata_shared::uuid::Uuid;

/// Identifies an asset within a project.
///
/// Generated identifiers are random 128-bit values formatted as 32 lowercase hex characters
/// without separators. Standard assets use fixed, human readable identifiers instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Generates a new random identifier.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_content::AssetId;
    /// let id = AssetId::generate();
    /// assert_eq!(id.as_str().len(), 32);
    /// assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    /// ```
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&AssetId> for AssetId {
    fn from(value: &AssetId) -> Self {
        value.clone()
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
