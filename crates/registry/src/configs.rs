//! Concrete configuration types.
//!
//! These are deliberately light: identity fields, a free-form parameter map,
//! and a `refresh` that overlays values found in the property accessor under
//! `confscope.<tag>.<ident>.<parameter>`. Anything beyond that (full field
//! validation, wire-level concerns) belongs to the systems that consume the
//! registry, not to the registry itself.

use crate::entry::ScopedConfig;
use confscope_core::{ConfigKind, ServiceKey, CONFIG_PROPERTY_PREFIX};
use confscope_props::PropertySource;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

fn refresh_overrides(
    props: &dyn PropertySource,
    tag: &str,
    ident: &str,
    parameters: &BTreeMap<String, String>,
    overrides: &RwLock<BTreeMap<String, String>>,
) {
    for key in parameters.keys() {
        let property = format!("{CONFIG_PROPERTY_PREFIX}.{tag}.{ident}.{key}");
        if let Some(value) = props.get_property(&property) {
            overrides.write().insert(key.clone(), value);
        }
    }
}

macro_rules! config_common {
    ($name:ident) => {
        impl $name {
            /// Explicit identifier for registry lookups.
            #[must_use]
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.id = Some(id.into());
                self
            }

            /// Explicitly mark or unmark this config as default-eligible.
            #[must_use]
            pub fn with_default(mut self, default: bool) -> Self {
                self.default = Some(default);
                self
            }

            /// Attach a free-form parameter.
            #[must_use]
            pub fn with_parameter(
                mut self,
                key: impl Into<String>,
                value: impl Into<String>,
            ) -> Self {
                self.parameters.insert(key.into(), value.into());
                self
            }

            /// Look up a parameter, preferring refreshed overrides.
            #[must_use]
            pub fn parameter(&self, key: &str) -> Option<String> {
                self.overrides
                    .read()
                    .get(key)
                    .or_else(|| self.parameters.get(key))
                    .cloned()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                if std::ptr::eq(self, other) {
                    return true;
                }
                self.fields_eq(other) && *self.overrides.read() == *other.overrides.read()
            }
        }

        impl Eq for $name {}
    };
}

/// A service export or reference bound to an interface triple.
macro_rules! interface_config {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            interface: String,
            group: String,
            version: String,
            id: Option<String>,
            default: Option<bool>,
            parameters: BTreeMap<String, String>,
            overrides: RwLock<BTreeMap<String, String>>,
        }

        impl $name {
            /// Create a config targeting the given interface.
            #[must_use]
            pub fn new(interface: impl Into<String>) -> Self {
                Self {
                    interface: interface.into(),
                    group: String::new(),
                    version: String::new(),
                    id: None,
                    default: None,
                    parameters: BTreeMap::new(),
                    overrides: RwLock::new(BTreeMap::new()),
                }
            }

            /// The service group.
            #[must_use]
            pub fn with_group(mut self, group: impl Into<String>) -> Self {
                self.group = group.into();
                self
            }

            /// The service version.
            #[must_use]
            pub fn with_version(mut self, version: impl Into<String>) -> Self {
                self.version = version.into();
                self
            }

            /// The targeted interface name.
            #[must_use]
            pub fn interface(&self) -> &str {
                &self.interface
            }

            fn fields_eq(&self, other: &Self) -> bool {
                self.interface == other.interface
                    && self.group == other.group
                    && self.version == other.version
                    && self.id == other.id
                    && self.default == other.default
                    && self.parameters == other.parameters
            }
        }

        config_common!($name);

        impl ScopedConfig for $name {
            fn kind(&self) -> ConfigKind {
                $kind
            }

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn is_default(&self) -> bool {
                self.default.unwrap_or_else(|| self.id.is_none())
            }

            fn service_key(&self) -> Option<ServiceKey> {
                Some(ServiceKey::new(
                    self.group.clone(),
                    self.interface.clone(),
                    self.version.clone(),
                ))
            }

            fn refresh(&self, props: &dyn PropertySource) {
                let ident = self.id.as_deref().unwrap_or(&self.interface).to_string();
                refresh_overrides(
                    props,
                    self.kind().tag(),
                    &ident,
                    &self.parameters,
                    &self.overrides,
                );
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn eq_config(&self, other: &dyn ScopedConfig) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|other| self == other)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} config", self.kind())?;
                if let Some(id) = &self.id {
                    write!(f, " '{id}'")?;
                }
                match self.service_key() {
                    Some(key) => write!(f, " [{key}]"),
                    None => Ok(()),
                }
            }
        }
    };
}

/// A provider/consumer-side defaults holder with no interface binding.
macro_rules! plain_config {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $name {
            id: Option<String>,
            default: Option<bool>,
            parameters: BTreeMap<String, String>,
            overrides: RwLock<BTreeMap<String, String>>,
        }

        impl $name {
            /// Create an empty config.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            fn fields_eq(&self, other: &Self) -> bool {
                self.id == other.id
                    && self.default == other.default
                    && self.parameters == other.parameters
            }
        }

        config_common!($name);

        impl ScopedConfig for $name {
            fn kind(&self) -> ConfigKind {
                $kind
            }

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn is_default(&self) -> bool {
                self.default.unwrap_or_else(|| self.id.is_none())
            }

            fn service_key(&self) -> Option<ServiceKey> {
                None
            }

            fn refresh(&self, props: &dyn PropertySource) {
                let ident = self.id.as_deref().unwrap_or("default").to_string();
                refresh_overrides(
                    props,
                    self.kind().tag(),
                    &ident,
                    &self.parameters,
                    &self.overrides,
                );
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn eq_config(&self, other: &dyn ScopedConfig) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|other| self == other)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} config", self.kind())?;
                match &self.id {
                    Some(id) => write!(f, " '{id}'"),
                    None => Ok(()),
                }
            }
        }
    };
}

interface_config!(
    /// An exported service bound to a (group, interface, version) triple.
    ServiceConfig,
    ConfigKind::Service
);

interface_config!(
    /// A reference to a remote service, bound to a (group, interface,
    /// version) triple.
    ReferenceConfig,
    ConfigKind::Reference
);

plain_config!(
    /// Provider-side defaults shared by exported services.
    ProviderConfig,
    ConfigKind::Provider
);

plain_config!(
    /// Consumer-side defaults shared by references.
    ConsumerConfig,
    ConfigKind::Consumer
);
