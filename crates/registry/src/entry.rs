//! The contract every registered configuration object implements.
//!
//! The registry stores configs as trait objects and never inspects their
//! concrete types. Behavior that varies by config kind is driven by the
//! explicit [`ConfigKind`] tag, not by downcasting; the only downcast lives
//! in [`ScopedConfig::eq_config`], where field equality genuinely needs the
//! concrete type.

use confscope_core::{ConfigKind, ServiceKey};
use confscope_props::PropertySource;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A shared, thread-safe handle to a registered configuration object.
pub type ConfigRef = Arc<dyn ScopedConfig>;

/// A configuration object that can live in a module-scoped registry.
pub trait ScopedConfig: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// The category this config belongs to.
    fn kind(&self) -> ConfigKind;

    /// The user-supplied identifier, if one was given.
    ///
    /// Configs registered without an id are stored under a deterministic
    /// generated id; the config itself is never mutated.
    fn id(&self) -> Option<&str>;

    /// Whether this config is eligible to be *the* default for its category.
    fn is_default(&self) -> bool;

    /// The derived unique key, present exactly for interface-bound kinds.
    fn service_key(&self) -> Option<ServiceKey>;

    /// Re-pull overridable values from the property accessor.
    fn refresh(&self, props: &dyn PropertySource);

    /// Upcast for concrete-type equality checks.
    fn as_any(&self) -> &dyn Any;

    /// Field-for-field equality against another config.
    ///
    /// Returns false when `other` is a different concrete type.
    fn eq_config(&self, other: &dyn ScopedConfig) -> bool;
}

/// Identity comparison for config handles.
#[must_use]
pub fn same_instance(a: &ConfigRef, b: &ConfigRef) -> bool {
    Arc::ptr_eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::{ProviderConfig, ServiceConfig};

    #[test]
    fn test_same_instance_is_pointer_identity() {
        let a: ConfigRef = Arc::new(ProviderConfig::new().with_id("p"));
        let b = Arc::clone(&a);
        let c: ConfigRef = Arc::new(ProviderConfig::new().with_id("p"));
        assert!(same_instance(&a, &b));
        assert!(!same_instance(&a, &c));
    }

    #[test]
    fn test_eq_config_rejects_other_concrete_types() {
        let provider = ProviderConfig::new();
        let service = ServiceConfig::new("com.acme.Cart");
        assert!(!provider.eq_config(&service));
    }
}
