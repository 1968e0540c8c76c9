//! Concrete property sources.
//!
//! `InMemoryProperties` backs tests and programmatic configuration;
//! `EnvProperties` exposes process environment variables under dotted keys.

use crate::source::PropertySource;
use std::collections::HashMap;

/// A map-backed property source.
///
/// Built up with [`InMemoryProperties::with`] and then shared read-only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProperties {
    values: HashMap<String, String>,
}

impl InMemoryProperties {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a property in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of stored properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the source holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertySource for InMemoryProperties {
    fn get_property(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// A property source backed by process environment variables.
///
/// Dotted keys are translated to conventional variable names before lookup:
/// `confscope.config.ignore-duplicated-interface` becomes
/// `CONFSCOPE_CONFIG_IGNORE_DUPLICATED_INTERFACE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProperties;

impl EnvProperties {
    /// Create an environment-backed source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn env_name(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl PropertySource for EnvProperties {
    fn get_property(&self, key: &str) -> Option<String> {
        std::env::var(Self::env_name(key)).ok()
    }
}
