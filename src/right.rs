//! Named rights, each owning one bit of a `u64` mask

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{CRUD, MAX_RIGHTS, NO_RIGHTS};
use crate::error::{AclError, Result};

/// Registry of named rights.
///
/// Each registration takes the next power of two above every bit assigned so
/// far, so the first right is 1, the second 2, the third 4 and so on. The
/// registry belongs to one engine; two engines never share bit assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightRegistry {
    rights: Vec<(String, u64)>,
    assigned: u64,
}

impl RightRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `create`, `read`, `update` and `delete` (1, 2, 4, 8)
    pub fn with_crud() -> Self {
        let rights: Vec<_> = CRUD.iter().map(|(n, b)| (n.to_string(), *b)).collect();
        let assigned = rights.iter().fold(NO_RIGHTS, |a, (_, b)| a | b);
        RightRegistry { rights, assigned }
    }

    /// Register a right and return its bit
    pub fn add(&mut self, name: &str) -> Result<u64> {
        if self.position(name).is_some() {
            return Err(AclError::DuplicateRight(name.to_string()));
        }
        let used = u64::BITS - self.assigned.leading_zeros();
        if used as usize >= MAX_RIGHTS {
            return Err(AclError::RightsExhausted { max: MAX_RIGHTS });
        }
        let bit = 1u64 << used;
        self.rights.push((name.to_string(), bit));
        self.assigned |= bit;
        Ok(bit)
    }

    /// Bit for `name`, or `NO_RIGHTS` when the name is unknown
    pub fn get(&self, name: &str) -> u64 {
        match self.position(name) {
            Some(i) => self.rights[i].1,
            None => {
                warn!(right = name, "unknown right grants nothing");
                NO_RIGHTS
            }
        }
    }

    /// Every assigned bit, in registration order
    pub fn all(&self) -> Vec<u64> {
        self.rights.iter().map(|(_, b)| *b).collect()
    }

    /// Union of every assigned bit
    pub fn all_mask(&self) -> u64 {
        self.assigned
    }

    /// OR of the bits for `names`; unknown names contribute nothing
    pub fn mask(&self, names: &[&str]) -> u64 {
        names.iter().fold(NO_RIGHTS, |a, n| a | self.get(n))
    }

    /// Names of the registered rights present in `mask`
    pub fn names(&self, mask: u64) -> Vec<&str> {
        self.rights
            .iter()
            .filter(|(_, b)| mask & b == *b)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rights.is_empty()
    }

    /// Forget every right; the next registration gets bit 1 again
    pub fn reset(&mut self) {
        self.rights.clear();
        self.assigned = NO_RIGHTS;
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rights.iter().position(|(n, _)| n == name)
    }
}
