//! Error types for bitacl

use std::fmt;

use thiserror::Error;

/// Which inheritance tree a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Role,
    Resource,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Role => f.write_str("role"),
            NodeKind::Resource => f.write_str("resource"),
        }
    }
}

/// Errors raised by acl operations. All of them are caller misuse, none are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    #[error("right `{0}` already exists")]
    DuplicateRight(String),

    #[error("no right bit left to assign (max {max} rights)")]
    RightsExhausted { max: usize },

    #[error("role `{0}` already exists")]
    DuplicateRole(String),

    #[error("resource `{0}` already exists")]
    DuplicateResource(String),

    /// ascendant named at insertion time is not registered
    #[error("ascendant {kind} `{name}` does not exist")]
    UnknownAscendant { kind: NodeKind, name: String },

    /// re-parenting would make a node its own ascendant
    #[error("{kind} `{name}` cannot extend one of its descendants")]
    CircularAscendant { kind: NodeKind, name: String },

    #[error("role `{0}` does not exist")]
    UnknownRole(String),

    #[error("resource `{0}` does not exist")]
    UnknownResource(String),

    /// `clear_not_used` on a role that was never compiled
    #[error("role `{0}` has no compiled rights")]
    NoCompiledEntry(String),
}

/// Result type alias for acl operations
pub type Result<T> = std::result::Result<T, AclError>;
