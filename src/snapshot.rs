//! Compiled (role, resource) -> mask matrix

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AclError, Result};

/// Immutable compiled rights.
///
/// Produced by [`AclEngine::build`](crate::AclEngine::build); lookups take
/// `&self` only, so one snapshot can be shared across threads behind an `Arc`
/// while the engine keeps changing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledAcl {
    matrix: HashMap<String, HashMap<String, u64>>,
}

impl CompiledAcl {
    pub(crate) fn insert(&mut self, role: &str, resource: &str, mask: u64) {
        self.matrix.entry(role.to_string()).or_default().insert(resource.to_string(), mask);
    }

    /// Make sure `role` has a row even when no resource exists
    pub(crate) fn ensure_row(&mut self, role: &str) {
        self.matrix.entry(role.to_string()).or_default();
    }

    /// Drop every row but `role`'s; false when that row does not exist
    pub(crate) fn retain_role(&mut self, role: &str) -> bool {
        match self.matrix.remove_entry(role) {
            Some((k, row)) => {
                self.matrix.clear();
                self.matrix.insert(k, row);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.matrix.clear();
    }

    /// Compiled mask, if the pair was compiled
    pub fn mask(&self, role: &str, resource: &str) -> Option<u64> {
        self.matrix.get(role)?.get(resource).copied()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.matrix.contains_key(role)
    }

    /// True when every bit of `rights` is granted to `role` on `resource`.
    /// An uncompiled resource grants nothing.
    pub fn is_allowed(&self, role: &str, resource: &str, rights: u64) -> Result<bool> {
        let row = self.matrix.get(role).ok_or_else(|| AclError::UnknownRole(role.to_string()))?;
        Ok(row.get(resource).is_some_and(|m| m & rights == rights))
    }

    /// Compiled role names, sorted
    pub fn roles(&self) -> Vec<&str> {
        let mut r: Vec<&str> = self.matrix.keys().map(String::as_str).collect();
        r.sort_unstable();
        r
    }

    /// Number of compiled (role, resource) pairs
    pub fn len(&self) -> usize {
        self.matrix.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
