//! Refresh token record.

use serde::{Deserialize, Serialize};

/// The single live refresh token of a member, keyed by member name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    key: String,
    value: String,
}

impl RefreshToken {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Member name owning this token
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Currently stored token value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the presented token is the one on record
    pub fn matches(&self, presented: &str) -> bool {
        self.value == presented
    }

    /// Replace the stored value after a rotation has been persisted
    pub fn update_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}
