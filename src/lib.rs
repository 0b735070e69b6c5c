//! Bitacl - in-memory access control lists compiled to bitmasks
//!
//! Rights are named bits. Roles and resources each form single-parent
//! hierarchies, and resources carry explicit allow/deny rules per role.
//! The engine folds those rules into one mask per (role, resource) pair:
//! - the ascendant resource's mask is the starting point
//! - this resource's rules are overlaid for each role of the chain, root first
//!
//! ```
//! use bitacl::{AclEngine, RightRegistry, CREATE, READ};
//!
//! let mut acl = AclEngine::with_rights(RightRegistry::with_crud());
//! acl.add_roles(&[("root", None), ("dev", Some("root"))])?;
//! acl.add_resources(&[("catalog", None), ("album", Some("catalog"))])?;
//! acl.allow(&["root"], &[], acl.rights().all_mask())?;
//! acl.deny(&["dev"], &[], CREATE)?;
//!
//! assert!(acl.is_allowed("dev", "album", READ)?);
//! assert!(!acl.is_allowed("dev", "album", CREATE | READ)?);
//! # Ok::<(), bitacl::AclError>(())
//! ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod resource;
pub mod right;
pub mod role;
pub mod shared;
pub mod snapshot;
pub mod tree;

pub use constants::*;
pub use engine::AclEngine;
pub use error::{AclError, NodeKind, Result};
pub use resource::{Resource, RuleSet};
pub use right::RightRegistry;
pub use role::Role;
pub use shared::SharedAcl;
pub use snapshot::CompiledAcl;
pub use tree::{Node, NodeId};
