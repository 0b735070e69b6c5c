//! Roles: named actors in a single-parent hierarchy

use crate::tree::{Node, NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: String,
    ascendant: Option<NodeId>,
}

impl Role {
    pub(crate) fn new(name: String, ascendant: Option<NodeId>) -> Self {
        Role { name, ascendant }
    }
}

impl Node for Role {
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

pub type RoleTree = Tree<Role>;

/// Role names in resolution order: root-most ascendant first, `id` last
pub fn resolution_order(roles: &RoleTree, id: NodeId) -> Vec<&str> {
    roles.lineage(id).into_iter().map(|r| roles.node(r).name()).collect()
}
