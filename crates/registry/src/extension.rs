//! Scope-chained extension lookup.
//!
//! Each scope owns a directory of named extension implementations. A module
//! directory chains to its application's: lookup checks local bindings
//! first, then walks up, so a module can shadow an application-wide binding
//! without mutating shared parent state. The registry never touches this;
//! scopes expose it to post-processors and other collaborators.

use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// A shared handle to an extension implementation of any type.
pub type ExtensionRef = Arc<dyn Any + Send + Sync>;

/// The level a directory is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionScope {
    /// Application-wide bindings, shared by every module.
    Application,
    /// Bindings local to one module scope.
    Module,
}

/// A name-keyed extension locator with parent-chain fallback.
pub struct ExtensionDirectory {
    scope: ExtensionScope,
    parent: Option<Arc<ExtensionDirectory>>,
    entries: DashMap<String, ExtensionRef>,
}

impl ExtensionDirectory {
    /// Create a root directory for an application scope.
    #[must_use]
    pub fn application() -> Arc<Self> {
        Arc::new(Self {
            scope: ExtensionScope::Application,
            parent: None,
            entries: DashMap::new(),
        })
    }

    /// Create a module-level directory chained to `parent`.
    #[must_use]
    pub fn module(parent: Arc<ExtensionDirectory>) -> Arc<Self> {
        Arc::new(Self {
            scope: ExtensionScope::Module,
            parent: Some(parent),
            entries: DashMap::new(),
        })
    }

    /// The level this directory is bound to.
    #[must_use]
    pub fn scope(&self) -> ExtensionScope {
        self.scope
    }

    /// Bind a named extension locally, returning the binding it replaced,
    /// if any. Parent directories are never written through.
    pub fn register(&self, name: impl Into<String>, extension: ExtensionRef) -> Option<ExtensionRef> {
        let name = name.into();
        debug!(name = %name, scope = ?self.scope, "registered extension");
        self.entries.insert(name, extension)
    }

    /// Resolve a name: local bindings first, then the parent chain.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ExtensionRef> {
        if let Some(entry) = self.entries.get(name) {
            return Some(Arc::clone(entry.value()));
        }
        self.parent.as_ref().and_then(|parent| parent.find(name))
    }

    /// Resolve a name and downcast to a concrete extension type.
    #[must_use]
    pub fn find_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.find(name).and_then(|ext| ext.downcast::<T>().ok())
    }
}

impl std::fmt::Debug for ExtensionDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionDirectory")
            .field("scope", &self.scope)
            .field("entries", &self.entries.len())
            .field("chained", &self.parent.is_some())
            .finish()
    }
}
