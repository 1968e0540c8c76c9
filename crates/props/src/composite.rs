//! Layered property resolution.

use crate::source::PropertySource;
use std::sync::Arc;
use tracing::debug;

/// An ordered stack of property sources.
///
/// Lookup walks the layers in registration order and returns the first value
/// found, so earlier layers override later ones. An empty composite resolves
/// nothing.
#[derive(Clone, Default)]
pub struct CompositeProperties {
    layers: Vec<Arc<dyn PropertySource>>,
}

impl CompositeProperties {
    /// Create an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower precedence than all existing layers,
    /// returning `self` for chaining.
    #[must_use]
    pub fn with_layer(mut self, source: Arc<dyn PropertySource>) -> Self {
        self.layers.push(source);
        self
    }

    /// Append a layer in place.
    pub fn push_layer(&mut self, source: Arc<dyn PropertySource>) {
        self.layers.push(source);
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl PropertySource for CompositeProperties {
    fn get_property(&self, key: &str) -> Option<String> {
        for (index, layer) in self.layers.iter().enumerate() {
            if let Some(value) = layer.get_property(key) {
                debug!(key, layer = index, "resolved property");
                return Some(value);
            }
        }
        None
    }
}

impl std::fmt::Debug for CompositeProperties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeProperties")
            .field("layers", &self.layers.len())
            .finish()
    }
}
