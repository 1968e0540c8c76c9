//! Domain value types for configuration identity.
//!
//! Every configuration entry carries a [`ConfigKind`] category tag, and
//! interface-bound entries additionally derive a [`ServiceKey`] naming their
//! logical target. Both types are plain data: cheap to clone, comparable by
//! value, and safe to share across threads.

use crate::constants::{GROUP_SEPARATOR, KEY_PLACEHOLDER, VERSION_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a configuration entry.
///
/// The category determines which duplicate-detection policy applies on
/// registration and whether the category participates in default resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    /// An exported service. Interface-bound; any number of instances.
    Service,
    /// A reference to a remote service. Interface-bound; any number of
    /// instances.
    Reference,
    /// Provider-side defaults. At most one default instance is resolvable.
    Provider,
    /// Consumer-side defaults. At most one default instance is resolvable.
    Consumer,
}

impl ConfigKind {
    /// All categories, in the order used by bulk operations such as refresh.
    pub const ALL: [ConfigKind; 4] = [
        ConfigKind::Provider,
        ConfigKind::Consumer,
        ConfigKind::Reference,
        ConfigKind::Service,
    ];

    /// Stable lowercase tag used in derived ids, property keys, and messages.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            ConfigKind::Service => "service",
            ConfigKind::Reference => "reference",
            ConfigKind::Provider => "provider",
            ConfigKind::Consumer => "consumer",
        }
    }

    /// Whether entries of this category target a service interface and carry
    /// a derived [`ServiceKey`].
    #[must_use]
    pub fn is_interface_bound(&self) -> bool {
        matches!(self, ConfigKind::Service | ConfigKind::Reference)
    }

    /// Whether this category resolves a single default entry.
    ///
    /// Multi-instance categories (service, reference) do not support default
    /// resolution at all.
    #[must_use]
    pub fn is_single_default(&self) -> bool {
        matches!(self, ConfigKind::Provider | ConfigKind::Consumer)
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The derived unique key of an interface-bound configuration:
/// `group/interface:version`.
///
/// An empty group or version is normalized to `-` at construction so that
/// two keys differing only in "unset vs. empty" compare equal. The key is
/// used solely for duplicate detection, never for primary lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceKey {
    group: String,
    interface: String,
    version: String,
}

impl ServiceKey {
    /// Build a key from its parts, normalizing empty group/version to the
    /// placeholder.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        interface: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: normalize(group.into()),
            interface: interface.into(),
            version: normalize(version.into()),
        }
    }

    /// The service group, or `-` when none was given.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The interface name. Never normalized.
    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The service version, or `-` when none was given.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

fn normalize(part: String) -> String {
    if part.is_empty() {
        KEY_PLACEHOLDER.to_string()
    } else {
        part
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.group, GROUP_SEPARATOR, self.interface, VERSION_SEPARATOR, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_are_stable() {
        assert_eq!(ConfigKind::Service.tag(), "service");
        assert_eq!(ConfigKind::Reference.tag(), "reference");
        assert_eq!(ConfigKind::Provider.tag(), "provider");
        assert_eq!(ConfigKind::Consumer.tag(), "consumer");
    }

    #[test]
    fn test_interface_bound_categories() {
        assert!(ConfigKind::Service.is_interface_bound());
        assert!(ConfigKind::Reference.is_interface_bound());
        assert!(!ConfigKind::Provider.is_interface_bound());
        assert!(!ConfigKind::Consumer.is_interface_bound());
    }

    #[test]
    fn test_single_default_categories() {
        assert!(ConfigKind::Provider.is_single_default());
        assert!(ConfigKind::Consumer.is_single_default());
        assert!(!ConfigKind::Service.is_single_default());
        assert!(!ConfigKind::Reference.is_single_default());
    }

    #[test]
    fn test_service_key_format() {
        let key = ServiceKey::new("shop", "com.acme.CartService", "1.2.0");
        assert_eq!(key.to_string(), "shop/com.acme.CartService:1.2.0");
    }

    #[test]
    fn test_service_key_normalizes_empty_parts() {
        let key = ServiceKey::new("", "com.acme.CartService", "");
        assert_eq!(key.to_string(), "-/com.acme.CartService:-");
        assert_eq!(key, ServiceKey::new("-", "com.acme.CartService", "-"));
    }

    #[test]
    fn test_service_key_equality_is_by_value() {
        let a = ServiceKey::new("g", "I", "1");
        let b = ServiceKey::new("g", "I", "1");
        let c = ServiceKey::new("g2", "I", "1");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_kind_serializes_as_lowercase_tag() {
        assert_eq!(
            serde_json::to_string(&ConfigKind::Provider).unwrap(),
            "\"provider\""
        );
        let kind: ConfigKind = serde_json::from_str("\"service\"").unwrap();
        assert_eq!(kind, ConfigKind::Service);
    }
}
