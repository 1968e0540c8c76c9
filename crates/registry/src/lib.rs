//! Module-scoped configuration registry for confscope
//!
//! Each module scope owns one [`ConfigRegistry`]: a category-bucketed store
//! of configuration objects with domain-identity duplicate detection, an
//! exactly-once initialization gate, and synchronous deploy notifications
//! fired when the module starts or stops.
//!
//! ## Key Components
//!
//! - **`entry`**: The [`ScopedConfig`] contract every stored config implements.
//! - **`configs`**: Concrete service/reference/provider/consumer config types.
//! - **`registry`**: The [`ConfigRegistry`] store and its add/get/clear surface.
//! - **`lifecycle`**: The run-once [`OnceGate`] and the [`ModuleState`] machine.
//! - **`listener`**: The [`DeployListener`] contract and ordered dispatch.
//! - **`extension`**: The scope-chained [`ExtensionDirectory`] locator.
//! - **`scope`**: The [`ApplicationScope`]/[`ModuleScope`] hierarchy tying it
//!   all together.

pub mod configs;
mod duplicate;
pub mod entry;
pub mod extension;
pub mod lifecycle;
pub mod listener;
pub mod registry;
pub mod scope;

pub use self::{
    configs::{ConsumerConfig, ProviderConfig, ReferenceConfig, ServiceConfig},
    entry::{ConfigRef, ScopedConfig},
    extension::{ExtensionDirectory, ExtensionRef, ExtensionScope},
    lifecycle::{ModuleState, OnceGate},
    listener::{DeployListener, ListenerSet},
    registry::{AddOutcome, ConfigRegistry},
    scope::{ApplicationScope, ModuleScope},
};
