//! Deploy notifications for module transitions.
//!
//! Listeners observe a module scope finishing its start or stop transition.
//! Dispatch is synchronous and ordered: listeners run on the thread driving
//! the transition, in registration order, and a failing listener never
//! prevents the ones after it from running.

use crate::scope::ModuleScope;
use confscope_core::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error};

/// Observer of module deploy transitions.
///
/// Implementations must not assume they run alone: other listeners may run
/// before or after, and a returned error is logged and isolated, never
/// surfaced to the transition caller.
pub trait DeployListener: Send + Sync {
    /// Name used in dispatch diagnostics.
    fn name(&self) -> &'static str;

    /// Called after the module has started (services exported, references
    /// resolved).
    fn on_module_started(&self, scope: &ModuleScope) -> Result<()>;

    /// Called after the module has stopped.
    fn on_module_stopped(&self, scope: &ModuleScope) -> Result<()>;
}

/// An ordered set of deploy listeners.
#[derive(Default)]
pub struct ListenerSet {
    listeners: RwLock<Vec<Arc<dyn DeployListener>>>,
}

impl ListenerSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. Dispatch order is registration order.
    pub fn register(&self, listener: Arc<dyn DeployListener>) {
        let mut listeners = self.listeners.write();
        listeners.push(listener);
        debug!(
            listener = listeners.last().map(|l| l.name()).unwrap_or(""),
            total = listeners.len(),
            "registered deploy listener"
        );
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    pub(crate) fn notify_started(&self, scope: &ModuleScope) {
        self.dispatch(scope, "module started", |listener, scope| {
            listener.on_module_started(scope)
        });
    }

    pub(crate) fn notify_stopped(&self, scope: &ModuleScope) {
        self.dispatch(scope, "module stopped", |listener, scope| {
            listener.on_module_stopped(scope)
        });
    }

    fn dispatch<F>(&self, scope: &ModuleScope, transition: &str, notify: F)
    where
        F: Fn(&dyn DeployListener, &ModuleScope) -> Result<()>,
    {
        // Snapshot so no lock is held while listener code runs; a listener
        // registering further listeners must not deadlock the dispatch.
        let listeners: Vec<_> = self.listeners.read().iter().cloned().collect();
        for listener in listeners {
            match notify(listener.as_ref(), scope) {
                Ok(()) => {
                    debug!(listener = listener.name(), transition, "notified deploy listener");
                }
                Err(e) => {
                    error!(
                        listener = listener.name(),
                        transition,
                        error = %e,
                        "deploy listener failed"
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}
