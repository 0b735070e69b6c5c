//! Single-parent arena shared by the role and resource hierarchies.
//!
//! Nodes are appended to a `Vec` and point at their ascendant by index.
//! An ascendant must already exist when a node is inserted, so the graph is
//! a forest by construction. Re-parenting through `extend` walks the new
//! parent's chain first and refuses anything that would close a loop.
//!
//! Registration and storage are separate: `retain_only` unregisters every
//! name but one while the arena keeps the unregistered ancestors, so the
//! surviving node still resolves its full chain.

use std::collections::HashMap;

use crate::error::{AclError, NodeKind, Result};

/// Index of a node in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A named node with at most one ascendant
pub trait Node {
    fn name(&self) -> &str;
    fn ascendant(&self) -> Option<NodeId>;
    fn set_ascendant(&mut self, ascendant: Option<NodeId>);
}

#[derive(Debug, Clone)]
pub struct Tree<T> {
    kind: NodeKind,
    nodes: Vec<T>,
    index: HashMap<String, NodeId>,
    registered: Vec<NodeId>,
}

impl<T: Node> Tree<T> {
    pub fn new(kind: NodeKind) -> Self {
        Tree { kind, nodes: Vec::new(), index: HashMap::new(), registered: Vec::new() }
    }

    /// Insert a node built by `make` from its name and resolved ascendant.
    /// An empty ascendant name means none.
    pub fn insert<F>(&mut self, name: &str, ascendant: Option<&str>, make: F) -> Result<NodeId>
    where
        F: FnOnce(String, Option<NodeId>) -> T,
    {
        if self.index.contains_key(name) {
            return Err(self.duplicate(name));
        }
        let parent = match ascendant.filter(|a| !a.is_empty()) {
            Some(a) => Some(self.require_ascendant(a)?),
            None => None,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(make(name.to_string(), parent));
        self.index.insert(name.to_string(), id);
        self.registered.push(id);
        Ok(id)
    }

    /// Re-parent a registered node
    pub fn extend(&mut self, name: &str, ascendant: Option<&str>) -> Result<()> {
        let id = self.index.get(name).copied().ok_or_else(|| self.unknown(name))?;
        let parent = match ascendant.filter(|a| !a.is_empty()) {
            Some(a) => Some(self.require_ascendant(a)?),
            None => None,
        };
        if let Some(p) = parent {
            if p == id || self.ancestors(p).any(|a| a == id) {
                return Err(AclError::CircularAscendant { kind: self.kind, name: name.to_string() });
            }
        }
        self.nodes[id.0].set_ascendant(parent);
        Ok(())
    }

    #[inline]
    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.id(name).map(|id| &self.nodes[id.0])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let id = self.id(name)?;
        Some(&mut self.nodes[id.0])
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &T {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0]
    }

    /// Ascendants of `id`, nearest first, `id` itself excluded
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cur = self.nodes[id.0].ascendant();
        std::iter::from_fn(move || {
            let here = cur?;
            cur = self.nodes[here.0].ascendant();
            Some(here)
        })
    }

    /// Root first, ending with `id` itself
    pub fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.reverse();
        chain.push(id);
        chain
    }

    /// Registered nodes in registration order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.registered.iter().map(move |&id| (id, &self.nodes[id.0]))
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<String> {
        self.iter().map(|(_, n)| n.name().to_string()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Unregister every node except `id`; the arena keeps its ascendants
    pub fn retain_only(&mut self, id: NodeId) {
        let name = self.nodes[id.0].name().to_string();
        self.index.clear();
        self.index.insert(name, id);
        self.registered = vec![id];
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.registered.clear();
    }

    fn require_ascendant(&self, name: &str) -> Result<NodeId> {
        self.id(name)
            .ok_or_else(|| AclError::UnknownAscendant { kind: self.kind, name: name.to_string() })
    }

    fn duplicate(&self, name: &str) -> AclError {
        match self.kind {
            NodeKind::Role => AclError::DuplicateRole(name.to_string()),
            NodeKind::Resource => AclError::DuplicateResource(name.to_string()),
        }
    }

    fn unknown(&self, name: &str) -> AclError {
        match self.kind {
            NodeKind::Role => AclError::UnknownRole(name.to_string()),
            NodeKind::Resource => AclError::UnknownResource(name.to_string()),
        }
    }
}
