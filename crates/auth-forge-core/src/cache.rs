use std::sync::atomic::{AtomicBool, Ordering};

/// Cache scope of a resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    Public,
    Private,
}

/// Execution-info hook through which resolvers narrow the response cache scope.
pub trait CacheControl: Send + Sync {
    fn set_scope(&self, scope: CacheScope);
}

/// Request-scoped [`CacheControl`] that remembers the narrowest scope requested.
///
/// Once any field asks for `Private` the hint stays private.
#[derive(Debug, Default)]
pub struct CacheHint {
    private: AtomicBool,
}

impl CacheHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> CacheScope {
        if self.private.load(Ordering::Acquire) {
            CacheScope::Private
        } else {
            CacheScope::Public
        }
    }
}

impl CacheControl for CacheHint {
    fn set_scope(&self, scope: CacheScope) {
        if scope == CacheScope::Private {
            self.private.store(true, Ordering::Release);
        }
    }
}
