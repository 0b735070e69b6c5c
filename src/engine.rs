//! Acl engine: role and resource registries, rules and the compiled cache
//!
//! The engine is either dirty or compiled. `allow`, `deny`, `add_*`,
//! `extend_*` and a full `reset` make it dirty; `is_allowed` (or `compile`)
//! recomputes the whole (role, resource) matrix and makes it compiled again.
//! `clear_not_used` and a partial `reset` leave the state untouched, so the
//! matrix may still hold rows for names that are no longer registered. Those
//! rows are visible through `compiled_mask` only: `is_allowed` checks the
//! role registry first.

use tracing::{debug, trace, warn};

use crate::error::{AclError, NodeKind, Result};
use crate::resource::{self, Resource, ResourceTree};
use crate::right::RightRegistry;
use crate::role::{Role, RoleTree};
use crate::snapshot::CompiledAcl;
use crate::tree::{Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone)]
pub struct AclEngine {
    rights: RightRegistry,
    roles: RoleTree,
    resources: ResourceTree,
    compiled: CompiledAcl,
    is_compiled: bool,
}

impl Default for AclEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AclEngine {
    /// Empty engine with an empty right registry
    pub fn new() -> Self {
        Self::with_rights(RightRegistry::new())
    }

    pub fn with_rights(rights: RightRegistry) -> Self {
        AclEngine {
            rights,
            roles: RoleTree::new(NodeKind::Role),
            resources: ResourceTree::new(NodeKind::Resource),
            compiled: CompiledAcl::default(),
            is_compiled: false,
        }
    }

    pub fn rights(&self) -> &RightRegistry {
        &self.rights
    }

    pub fn rights_mut(&mut self) -> &mut RightRegistry {
        &mut self.rights
    }

    // Roles

    /// Register a role under an already registered ascendant (or none)
    pub fn add_role(&mut self, name: &str, ascendant: Option<&str>) -> Result<()> {
        self.roles.insert(name, ascendant, Role::new)?;
        self.is_compiled = false;
        trace!(role = name, ascendant, "role added");
        Ok(())
    }

    /// Register roles in order; an entry may extend an earlier one.
    /// Stops at the first failure, keeping what was added before it.
    pub fn add_roles(&mut self, roles: &[(&str, Option<&str>)]) -> Result<()> {
        roles.iter().try_for_each(|&(name, asc)| self.add_role(name, asc))
    }

    /// Move a registered role under another ascendant (or make it a root)
    pub fn extend_role(&mut self, name: &str, ascendant: Option<&str>) -> Result<()> {
        self.roles.extend(name, ascendant)?;
        self.is_compiled = false;
        trace!(role = name, ascendant, "role extended");
        Ok(())
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Registered role names, in registration order
    pub fn role_names(&self) -> Vec<String> {
        self.roles.names()
    }

    /// Ascendants of a role, root first, the role itself excluded
    pub fn role_ascendants(&self, name: &str) -> Result<Vec<String>> {
        let id = self.role_id(name)?;
        let mut chain = self.roles.lineage(id);
        chain.pop();
        Ok(chain.into_iter().map(|a| self.roles.node(a).name().to_string()).collect())
    }

    // Resources

    /// Register a resource under an already registered ascendant (or none)
    pub fn add_resource(&mut self, name: &str, ascendant: Option<&str>) -> Result<()> {
        self.resources.insert(name, ascendant, Resource::new)?;
        self.is_compiled = false;
        trace!(resource = name, ascendant, "resource added");
        Ok(())
    }

    /// Register resources in order; an entry may extend an earlier one.
    /// Stops at the first failure, keeping what was added before it.
    pub fn add_resources(&mut self, resources: &[(&str, Option<&str>)]) -> Result<()> {
        resources.iter().try_for_each(|&(name, asc)| self.add_resource(name, asc))
    }

    /// Move a registered resource under another ascendant (or make it a root)
    pub fn extend_resource(&mut self, name: &str, ascendant: Option<&str>) -> Result<()> {
        self.resources.extend(name, ascendant)?;
        self.is_compiled = false;
        trace!(resource = name, ascendant, "resource extended");
        Ok(())
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains(name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Registered resource names, in registration order
    pub fn resource_names(&self) -> Vec<String> {
        self.resources.names()
    }

    /// Ascendants of a resource, root first, the resource itself excluded
    pub fn resource_ascendants(&self, name: &str) -> Result<Vec<String>> {
        let id = self
            .resources
            .id(name)
            .ok_or_else(|| AclError::UnknownResource(name.to_string()))?;
        let mut chain = self.resources.lineage(id);
        chain.pop();
        Ok(chain.into_iter().map(|a| self.resources.node(a).name().to_string()).collect())
    }

    // Rules

    /// Grant `rights` to `roles` on `resources`.
    ///
    /// An empty `roles` (or `resources`) stands for every role (resource)
    /// registered right now; later additions are not covered. Unregistered
    /// resources are skipped, unregistered roles are an error.
    pub fn allow(&mut self, roles: &[&str], resources: &[&str], rights: u64) -> Result<()> {
        self.apply(roles, resources, rights, Effect::Allow)
    }

    /// Deny `rights` to `roles` on `resources`, with the same expansion as `allow`
    pub fn deny(&mut self, roles: &[&str], resources: &[&str], rights: u64) -> Result<()> {
        self.apply(roles, resources, rights, Effect::Deny)
    }

    fn apply(&mut self, roles: &[&str], resources: &[&str], rights: u64, effect: Effect) -> Result<()> {
        self.is_compiled = false;

        let roles: Vec<String> = if roles.is_empty() {
            self.roles.names()
        } else {
            roles.iter().map(|r| r.to_string()).collect()
        };
        let targets: Vec<NodeId> = if resources.is_empty() {
            self.resources.iter().map(|(id, _)| id).collect()
        } else {
            resources
                .iter()
                .filter_map(|r| {
                    let id = self.resources.id(r);
                    if id.is_none() {
                        warn!(resource = *r, "skipping unknown resource");
                    }
                    id
                })
                .collect()
        };

        if !targets.is_empty() {
            if let Some(missing) = roles.iter().find(|r| !self.roles.contains(r.as_str())) {
                return Err(AclError::UnknownRole(missing.clone()));
            }
        }

        for id in targets {
            let res = self.resources.node_mut(id);
            for role in &roles {
                match effect {
                    Effect::Allow => res.allow(role, rights),
                    Effect::Deny => res.deny(role, rights),
                }
            }
        }
        trace!(?effect, ?roles, rights, "rules applied");
        Ok(())
    }

    // Queries

    /// True when `role` holds every bit of `rights` on `resource`.
    /// Recompiles first when dirty; an unknown resource grants nothing.
    pub fn is_allowed(&mut self, role: &str, resource: &str, rights: u64) -> Result<bool> {
        self.role_id(role)?;
        if !self.is_compiled {
            self.compile();
        }
        Ok(self.lookup(role, resource, rights))
    }

    /// Compiled mask of `role` on `resource`, recompiling first when dirty
    pub fn effective_rights(&mut self, role: &str, resource: &str) -> Result<u64> {
        self.role_id(role)?;
        if !self.is_compiled {
            self.compile();
        }
        Ok(self.compiled.mask(role, resource).unwrap_or_default())
    }

    /// `is_allowed` against the current matrix, without recompiling
    pub(crate) fn check_compiled(&self, role: &str, resource: &str, rights: u64) -> Result<bool> {
        self.role_id(role)?;
        Ok(self.lookup(role, resource, rights))
    }

    fn lookup(&self, role: &str, resource: &str, rights: u64) -> bool {
        self.compiled.mask(role, resource).is_some_and(|m| m & rights == rights)
    }

    pub fn is_compiled(&self) -> bool {
        self.is_compiled
    }

    /// Raw matrix entry, stale or not
    pub fn compiled_mask(&self, role: &str, resource: &str) -> Option<u64> {
        self.compiled.mask(role, resource)
    }

    /// Recompute every registered (role, resource) pair into the matrix
    pub fn compile(&mut self) {
        let mut n = 0usize;
        for (role_id, role) in self.roles.iter() {
            for (res_id, res) in self.resources.iter() {
                let mask = resource::compile(&self.resources, res_id, &self.roles, role_id);
                self.compiled.insert(role.name(), res.name(), mask);
                n += 1;
            }
        }
        self.is_compiled = true;
        debug!(roles = self.roles.len(), resources = self.resources.len(), pairs = n, "acl compiled");
    }

    /// Compile the current rules into a fresh immutable snapshot.
    /// The engine's own cache and state are left alone.
    pub fn build(&self) -> CompiledAcl {
        let mut snap = CompiledAcl::default();
        for (role_id, role) in self.roles.iter() {
            snap.ensure_row(role.name());
            for (res_id, res) in self.resources.iter() {
                snap.insert(role.name(), res.name(), resource::compile(&self.resources, res_id, &self.roles, role_id));
            }
        }
        debug!(roles = self.roles.len(), resources = self.resources.len(), "acl snapshot built");
        snap
    }

    // Lifecycle

    /// Drop every role and resource (with their rules). A full reset also
    /// drops the compiled matrix and marks the engine dirty; a partial one
    /// keeps both as they are.
    pub fn reset(&mut self, full: bool) {
        self.roles.clear();
        self.resources.clear();
        if full {
            self.compiled.clear();
            self.is_compiled = false;
        }
        trace!(full, "acl reset");
    }

    /// Keep only `role`: its compiled row and its registration.
    /// Every other role and compiled row is discarded; the state is unchanged.
    pub fn clear_not_used(&mut self, role: &str) -> Result<()> {
        if !self.compiled.retain_role(role) {
            return Err(AclError::NoCompiledEntry(role.to_string()));
        }
        match self.roles.id(role) {
            Some(id) => self.roles.retain_only(id),
            None => {
                self.roles.clear();
                self.roles.insert(role, None, Role::new)?;
            }
        }
        trace!(role, "unused roles cleared");
        Ok(())
    }

    fn role_id(&self, name: &str) -> Result<NodeId> {
        self.roles.id(name).ok_or_else(|| AclError::UnknownRole(name.to_string()))
    }
}
