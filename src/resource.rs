//! Resources: protected objects carrying explicit per-role rules
//!
//! Compilation for a (role, resource) pair is a fixed two-phase fold:
//! - resource chain, root first: each level starts from what its ascendant produced
//! - at every level, the role chain root first and the queried role last
//!
//! so an explicit rule at a resource beats anything inherited from its
//! ascendant resources, and a more specific role beats its ascendants at the
//! same resource.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::NO_RIGHTS;
use crate::role::{resolution_order, RoleTree};
use crate::tree::{Node, NodeId, Tree};

/// Explicit verdicts of one role at one resource.
///
/// A bit is in at most one of the two masks; bits in neither are unset and
/// leave the inherited value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub allowed: u64,
    pub denied: u64,
}

impl RuleSet {
    pub fn allow(&mut self, rights: u64) {
        self.allowed |= rights;
        self.denied &= !rights;
    }

    pub fn deny(&mut self, rights: u64) {
        self.denied |= rights;
        self.allowed &= !rights;
    }

    /// Overlay these verdicts on `base`
    #[inline]
    pub fn apply(&self, base: u64) -> u64 {
        (base | self.allowed) & !self.denied
    }

    /// Explicit verdict for a single bit: `Some(true)` allowed, `Some(false)` denied
    pub fn verdict(&self, bit: u64) -> Option<bool> {
        if self.allowed & bit == bit && bit != 0 {
            Some(true)
        } else if self.denied & bit == bit && bit != 0 {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    ascendant: Option<NodeId>,
    rules: HashMap<String, RuleSet>,
}

impl Resource {
    pub(crate) fn new(name: String, ascendant: Option<NodeId>) -> Self {
        Resource { name, ascendant, rules: HashMap::new() }
    }

    /// Record an explicit grant of every bit in `rights` for `role`
    pub fn allow(&mut self, role: &str, rights: u64) {
        self.rules.entry(role.to_string()).or_default().allow(rights);
    }

    /// Record an explicit denial of every bit in `rights` for `role`
    pub fn deny(&mut self, role: &str, rights: u64) {
        self.rules.entry(role.to_string()).or_default().deny(rights);
    }

    pub fn rules(&self, role: &str) -> Option<&RuleSet> {
        self.rules.get(role)
    }

    /// Overlay this level's rules for each role of `order`, in order
    fn overlay(&self, base: u64, order: &[&str]) -> u64 {
        order
            .iter()
            .filter_map(|r| self.rules.get(*r))
            .fold(base, |acc, rules| rules.apply(acc))
    }
}

impl Node for Resource {
    fn name(&self) -> &str {
        &self.name
    }

    fn ascendant(&self) -> Option<NodeId> {
        self.ascendant
    }

    fn set_ascendant(&mut self, ascendant: Option<NodeId>) {
        self.ascendant = ascendant;
    }
}

pub type ResourceTree = Tree<Resource>;

/// Effective mask of `role` at `resource`
pub fn compile(resources: &ResourceTree, resource: NodeId, roles: &RoleTree, role: NodeId) -> u64 {
    let order = resolution_order(roles, role);
    resources
        .lineage(resource)
        .into_iter()
        .fold(NO_RIGHTS, |base, level| resources.node(level).overlay(base, &order))
}
