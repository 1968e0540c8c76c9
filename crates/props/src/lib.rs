//! Flat key-value property access for confscope
//!
//! This crate provides the configuration accessor consumed by the registry
//! during scope initialization:
//! - The `PropertySource` trait, a flat string-keyed lookup
//! - In-memory and process-environment backed sources
//! - A layered composite where the first source with a value wins

pub mod composite;
pub mod providers;
pub mod source;

pub use composite::CompositeProperties;
pub use providers::{EnvProperties, InMemoryProperties};
pub use source::PropertySource;
