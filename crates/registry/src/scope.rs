//! The application/module scope hierarchy.
//!
//! An application scope carries the property stack and the application-wide
//! extension directory. Each module scope holds a back-reference to its
//! application, a chained module-level extension directory, one config
//! registry, and the deploy listeners observing its lifecycle. Tearing down
//! a module never affects the application.

use crate::configs::{ConsumerConfig, ProviderConfig, ReferenceConfig, ServiceConfig};
use crate::entry::ConfigRef;
use crate::extension::ExtensionDirectory;
use crate::lifecycle::ModuleState;
use crate::listener::{DeployListener, ListenerSet};
use crate::registry::{AddOutcome, ConfigRegistry};
use confscope_core::{ConfigKind, Error, Result};
use confscope_props::PropertySource;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// The application-wide context shared by all module scopes.
pub struct ApplicationScope {
    properties: Arc<dyn PropertySource>,
    extensions: Arc<ExtensionDirectory>,
}

impl ApplicationScope {
    /// Create an application scope around a property stack.
    #[must_use]
    pub fn new(properties: Arc<dyn PropertySource>) -> Self {
        Self {
            properties,
            extensions: ExtensionDirectory::application(),
        }
    }

    /// The application's flat property accessor.
    #[must_use]
    pub fn properties(&self) -> &dyn PropertySource {
        self.properties.as_ref()
    }

    /// The application-level extension directory.
    #[must_use]
    pub fn extensions(&self) -> &Arc<ExtensionDirectory> {
        &self.extensions
    }
}

impl std::fmt::Debug for ApplicationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationScope")
            .field("extensions", &self.extensions)
            .finish()
    }
}

/// A module-level context: the unit of lifetime for one config registry.
///
/// The scope owns its registry and drives the lifecycle machine; the
/// back-reference to the application is shared, not owned. Once the scope is
/// stopped it is never reused; registrations are rejected from then on.
pub struct ModuleScope {
    application: Arc<ApplicationScope>,
    extensions: Arc<ExtensionDirectory>,
    registry: ConfigRegistry,
    listeners: ListenerSet,
    state: Mutex<ModuleState>,
}

impl ModuleScope {
    /// Create a module scope under `application`.
    #[must_use]
    pub fn new(application: Arc<ApplicationScope>) -> Self {
        let extensions = ExtensionDirectory::module(Arc::clone(application.extensions()));
        Self {
            application,
            extensions,
            registry: ConfigRegistry::new(),
            listeners: ListenerSet::new(),
            state: Mutex::new(ModuleState::Created),
        }
    }

    /// The owning application scope.
    #[must_use]
    pub fn application(&self) -> &Arc<ApplicationScope> {
        &self.application
    }

    /// The module-level extension directory, chained to the application's.
    #[must_use]
    pub fn extensions(&self) -> &Arc<ExtensionDirectory> {
        &self.extensions
    }

    /// The module's config registry.
    #[must_use]
    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ModuleState {
        *self.state.lock()
    }

    /// Register a deploy listener; dispatch order is registration order.
    pub fn register_listener(&self, listener: Arc<dyn DeployListener>) {
        self.listeners.register(listener);
    }

    /// Run registry initialization for this scope.
    ///
    /// Safe to call repeatedly and concurrently: once the scope has left
    /// `Created` this is a no-op. Errors only on a scope already torn down.
    pub fn initialize(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            match *state {
                ModuleState::Created => *state = ModuleState::Initializing,
                ModuleState::Initializing | ModuleState::Active => return Ok(()),
                ModuleState::Stopping | ModuleState::Stopped => {
                    return Err(Error::scope_stopped("initialize"));
                }
            }
        }
        debug!(state = %ModuleState::Initializing, "module scope transition");
        self.registry.initialize(self.application.properties());
        Ok(())
    }

    /// Bring the module up: initialize, refresh stored configs from the
    /// application properties, enter `Active`, and notify listeners.
    ///
    /// Exactly one caller completes the transition; a second `start` fails
    /// with an illegal-transition error and fires no notification.
    pub fn start(&self) -> Result<()> {
        self.initialize()?;
        self.registry.refresh_all(self.application.properties());
        self.transition(ModuleState::Active)?;
        self.listeners.notify_started(self);
        Ok(())
    }

    /// Tear the module down: enter `Stopping`, clear the registry, enter the
    /// terminal `Stopped` state, and notify listeners.
    ///
    /// Only an `Active` module can be stopped; a second `stop` fails and
    /// fires no notification.
    pub fn stop(&self) -> Result<()> {
        self.transition(ModuleState::Stopping)?;
        self.registry.clear();
        self.transition(ModuleState::Stopped)?;
        self.listeners.notify_stopped(self);
        Ok(())
    }

    fn transition(&self, next: ModuleState) -> Result<()> {
        let mut state = self.state.lock();
        *state = state.checked_transition(next)?;
        debug!(state = %next, "module scope transition");
        Ok(())
    }

    fn ensure_accepting(&self, operation: &str) -> Result<()> {
        match self.state() {
            ModuleState::Stopping | ModuleState::Stopped => {
                Err(Error::scope_stopped(operation))
            }
            _ => Ok(()),
        }
    }

    /// Register any config, rejecting registrations on a torn-down scope.
    pub fn add_config(&self, config: ConfigRef) -> Result<AddOutcome> {
        self.ensure_accepting("add config")?;
        self.registry.add(config)
    }

    /// Refresh every stored config from the application properties.
    pub fn refresh_all(&self) {
        self.registry.refresh_all(self.application.properties());
    }

    // Service config correlative methods

    pub fn add_service(&self, config: ServiceConfig) -> Result<AddOutcome> {
        self.add_config(Arc::new(config))
    }

    pub fn add_services(
        &self,
        configs: impl IntoIterator<Item = ServiceConfig>,
    ) -> Result<()> {
        for config in configs {
            self.add_service(config)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get_service(&self, id: &str) -> Option<ConfigRef> {
        self.registry.get(ConfigKind::Service, id)
    }

    #[must_use]
    pub fn get_services(&self) -> Vec<ConfigRef> {
        self.registry.get_all(ConfigKind::Service)
    }

    // Reference config correlative methods

    pub fn add_reference(&self, config: ReferenceConfig) -> Result<AddOutcome> {
        self.add_config(Arc::new(config))
    }

    pub fn add_references(
        &self,
        configs: impl IntoIterator<Item = ReferenceConfig>,
    ) -> Result<()> {
        for config in configs {
            self.add_reference(config)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get_reference(&self, id: &str) -> Option<ConfigRef> {
        self.registry.get(ConfigKind::Reference, id)
    }

    #[must_use]
    pub fn get_references(&self) -> Vec<ConfigRef> {
        self.registry.get_all(ConfigKind::Reference)
    }

    // Provider config correlative methods

    pub fn add_provider(&self, config: ProviderConfig) -> Result<AddOutcome> {
        self.add_config(Arc::new(config))
    }

    pub fn add_providers(
        &self,
        configs: impl IntoIterator<Item = ProviderConfig>,
    ) -> Result<()> {
        for config in configs {
            self.add_provider(config)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get_provider(&self, id: &str) -> Option<ConfigRef> {
        self.registry.get(ConfigKind::Provider, id)
    }

    #[must_use]
    pub fn get_providers(&self) -> Vec<ConfigRef> {
        self.registry.get_all(ConfigKind::Provider)
    }

    /// The first default-eligible provider, if any.
    #[must_use]
    pub fn get_default_provider(&self) -> Option<ConfigRef> {
        self.registry.get_default(ConfigKind::Provider).unwrap_or(None)
    }

    // Consumer config correlative methods

    pub fn add_consumer(&self, config: ConsumerConfig) -> Result<AddOutcome> {
        self.add_config(Arc::new(config))
    }

    pub fn add_consumers(
        &self,
        configs: impl IntoIterator<Item = ConsumerConfig>,
    ) -> Result<()> {
        for config in configs {
            self.add_consumer(config)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get_consumer(&self, id: &str) -> Option<ConfigRef> {
        self.registry.get(ConfigKind::Consumer, id)
    }

    #[must_use]
    pub fn get_consumers(&self) -> Vec<ConfigRef> {
        self.registry.get_all(ConfigKind::Consumer)
    }

    /// The first default-eligible consumer, if any.
    #[must_use]
    pub fn get_default_consumer(&self) -> Option<ConfigRef> {
        self.registry.get_default(ConfigKind::Consumer).unwrap_or(None)
    }
}

impl std::fmt::Debug for ModuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleScope")
            .field("state", &self.state())
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confscope_props::InMemoryProperties;

    fn module() -> ModuleScope {
        let app = Arc::new(ApplicationScope::new(Arc::new(InMemoryProperties::new())));
        ModuleScope::new(app)
    }

    #[test]
    fn test_typed_accessors_round_trip() {
        let scope = module();
        scope
            .add_service(ServiceConfig::new("com.acme.Cart").with_id("s1"))
            .unwrap();
        scope.add_provider(ProviderConfig::new().with_id("p1")).unwrap();

        assert!(scope.get_service("s1").is_some());
        assert!(scope.get_provider("p1").is_some());
        assert!(scope.get_reference("s1").is_none());
        assert_eq!(scope.get_services().len(), 1);
        assert_eq!(scope.get_providers().len(), 1);
    }

    #[test]
    fn test_batch_adds_register_in_order() {
        let scope = module();
        scope
            .add_consumers([
                ConsumerConfig::new(),
                ConsumerConfig::new().with_parameter("n", "2"),
            ])
            .unwrap();

        let consumers = scope.get_consumers();
        assert_eq!(consumers.len(), 2);
        let default = scope.get_default_consumer().unwrap();
        assert!(Arc::ptr_eq(&default, &consumers[0]));
    }

    #[test]
    fn test_module_extensions_chain_to_application() {
        let app = Arc::new(ApplicationScope::new(Arc::new(InMemoryProperties::new())));
        app.extensions().register("marker", Arc::new(7_u32));
        let scope = ModuleScope::new(Arc::clone(&app));

        assert_eq!(*scope.extensions().find_as::<u32>("marker").unwrap(), 7);
        assert!(Arc::ptr_eq(scope.application(), &app));
    }

    #[test]
    fn test_initialize_reads_application_properties() {
        let props = InMemoryProperties::new()
            .with("confscope.config.ignore-duplicated-interface", "true");
        let app = Arc::new(ApplicationScope::new(Arc::new(props)));
        let scope = ModuleScope::new(app);

        scope.initialize().unwrap();
        assert_eq!(scope.state(), ModuleState::Initializing);
        assert!(scope.registry().ignores_duplicated_interface());

        // Repeated initialization is a no-op, not an error.
        scope.initialize().unwrap();
    }
}
