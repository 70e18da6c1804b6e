// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workload identifier.

use serde::{Deserialize, Serialize};

/// Unique identifier for a submitted workload.
///
/// Format is `wld-` followed by a 19-character nanoid, minted by the
/// scheduler at submit time. Accepts arbitrary strings on the parse path so
/// persisted state from older builds round-trips.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkloadId(String);

impl WorkloadId {
    pub const PREFIX: &'static str = "wld-";

    /// Generate a new random ID with the type prefix.
    pub fn new() -> Self {
        Self(format!("{}{}", Self::PREFIX, nanoid::nanoid!(19)))
    }

    /// Create an ID from an existing string (parsing, deserialization).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ID suffix without the type prefix.
    pub fn suffix(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }
}

impl Default for WorkloadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkloadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkloadId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for WorkloadId {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl AsRef<str> for WorkloadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for WorkloadId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for WorkloadId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WorkloadId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
