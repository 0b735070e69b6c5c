//! Engine behind a read-write lock

use parking_lot::RwLock;

use crate::engine::AclEngine;
use crate::error::Result;
use crate::snapshot::CompiledAcl;

/// An [`AclEngine`] shared between threads.
///
/// Checks against an already compiled engine only take the shared lock;
/// mutations and recompiles take the exclusive one.
#[derive(Debug, Default)]
pub struct SharedAcl {
    inner: RwLock<AclEngine>,
}

impl SharedAcl {
    pub fn new(engine: AclEngine) -> Self {
        SharedAcl { inner: RwLock::new(engine) }
    }

    /// Run `f` under the shared lock
    pub fn read<T, F: FnOnce(&AclEngine) -> T>(&self, f: F) -> T {
        f(&self.inner.read())
    }

    /// Run `f` under the exclusive lock
    pub fn write<T, F: FnOnce(&mut AclEngine) -> T>(&self, f: F) -> T {
        f(&mut self.inner.write())
    }

    pub fn is_allowed(&self, role: &str, resource: &str, rights: u64) -> Result<bool> {
        {
            let engine = self.inner.read();
            if engine.is_compiled() {
                return engine.check_compiled(role, resource, rights);
            }
        }
        // recompiles unless another writer got there first
        self.inner.write().is_allowed(role, resource, rights)
    }

    pub fn build(&self) -> CompiledAcl {
        self.inner.read().build()
    }

    pub fn into_inner(self) -> AclEngine {
        self.inner.into_inner()
    }
}

impl From<AclEngine> for SharedAcl {
    fn from(engine: AclEngine) -> Self {
        Self::new(engine)
    }
}
