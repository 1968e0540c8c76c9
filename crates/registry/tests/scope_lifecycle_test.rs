//! Module scope lifecycle: state transitions, deploy notifications, and
//! the stopped-scope registration contract.

use confscope_core::Error;
use confscope_props::InMemoryProperties;
use confscope_registry::{
    ApplicationScope, ConsumerConfig, DeployListener, ModuleScope, ModuleState, ProviderConfig,
    ServiceConfig,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Listener that records every notification it receives, optionally failing
/// to exercise failure isolation.
struct RecordingListener {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingListener {
    fn new(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            log,
            fail: false,
        })
    }

    fn failing(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            log,
            fail: true,
        })
    }

    fn record(&self, event: &str, scope: &ModuleScope) -> confscope_core::Result<()> {
        self.log
            .lock()
            .push(format!("{}:{}:{}", self.name, event, scope.state()));
        if self.fail {
            Err(Error::listener(self.name, "induced failure"))
        } else {
            Ok(())
        }
    }
}

impl DeployListener for RecordingListener {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_module_started(&self, scope: &ModuleScope) -> confscope_core::Result<()> {
        self.record("started", scope)
    }

    fn on_module_stopped(&self, scope: &ModuleScope) -> confscope_core::Result<()> {
        self.record("stopped", scope)
    }
}

fn module() -> ModuleScope {
    let app = Arc::new(ApplicationScope::new(Arc::new(InMemoryProperties::new())));
    ModuleScope::new(app)
}

#[test]
fn start_walks_the_machine_and_notifies_in_registration_order() {
    let scope = module();
    let log = Arc::new(Mutex::new(Vec::new()));
    scope.register_listener(RecordingListener::new("first", Arc::clone(&log)));
    scope.register_listener(RecordingListener::new("second", Arc::clone(&log)));

    assert_eq!(scope.state(), ModuleState::Created);
    scope.start().unwrap();
    assert_eq!(scope.state(), ModuleState::Active);

    assert_eq!(
        *log.lock(),
        vec!["first:started:active", "second:started:active"]
    );
}

#[test]
fn a_failing_listener_does_not_block_later_listeners() {
    let scope = module();
    let log = Arc::new(Mutex::new(Vec::new()));
    scope.register_listener(RecordingListener::failing("flaky", Arc::clone(&log)));
    scope.register_listener(RecordingListener::new("steady", Arc::clone(&log)));

    // The transition itself succeeds despite the listener failure.
    scope.start().unwrap();
    assert_eq!(
        *log.lock(),
        vec!["flaky:started:active", "steady:started:active"]
    );
}

#[test]
fn notifications_never_fire_twice() {
    let scope = module();
    let log = Arc::new(Mutex::new(Vec::new()));
    scope.register_listener(RecordingListener::new("only", Arc::clone(&log)));

    scope.start().unwrap();
    assert!(scope.start().is_err());
    scope.stop().unwrap();
    assert!(scope.stop().is_err());

    assert_eq!(
        *log.lock(),
        vec!["only:started:active", "only:stopped:stopped"]
    );
}

#[test]
fn stop_clears_the_registry_and_reaches_the_terminal_state() {
    let scope = module();
    scope
        .add_service(ServiceConfig::new("com.acme.Cart").with_id("s1"))
        .unwrap();
    scope.start().unwrap();

    scope.stop().unwrap();
    assert_eq!(scope.state(), ModuleState::Stopped);
    assert!(scope.registry().is_empty());
    assert!(scope.get_service("s1").is_none());
}

#[test]
fn a_stopped_scope_rejects_registrations() {
    let scope = module();
    scope.start().unwrap();
    scope.stop().unwrap();

    let err = scope.add_service(ServiceConfig::new("com.acme.Cart")).unwrap_err();
    assert!(matches!(err, Error::ScopeStopped { .. }));
    assert!(scope
        .add_provider(ProviderConfig::new())
        .is_err());
    assert!(scope.add_consumers([ConsumerConfig::new()]).is_err());

    // The stopped-scope contract lives in the scope; the registry itself
    // stays reusable after clear, by design.
    assert!(scope
        .registry()
        .add(Arc::new(ServiceConfig::new("com.acme.Cart")))
        .is_ok());
}

#[test]
fn a_stopped_scope_cannot_be_restarted() {
    let scope = module();
    scope.start().unwrap();
    scope.stop().unwrap();

    let err = scope.start().unwrap_err();
    assert!(matches!(err, Error::ScopeStopped { .. }));
}

#[test]
fn stop_requires_an_active_module() {
    let scope = module();
    assert!(matches!(
        scope.stop().unwrap_err(),
        Error::InvalidTransition { .. }
    ));

    scope.initialize().unwrap();
    assert!(scope.stop().is_err());
    assert_eq!(scope.state(), ModuleState::Initializing);
}

#[test]
fn concurrent_starts_notify_exactly_once() {
    let scope = Arc::new(module());
    let log = Arc::new(Mutex::new(Vec::new()));
    scope.register_listener(RecordingListener::new("watcher", Arc::clone(&log)));

    std::thread::scope(|threads| {
        for _ in 0..8 {
            let scope = Arc::clone(&scope);
            threads.spawn(move || {
                // Racing starts: one wins, the rest fail the transition.
                let _ = scope.start();
            });
        }
    });

    assert_eq!(scope.state(), ModuleState::Active);
    assert_eq!(*log.lock(), vec!["watcher:started:active"]);
}

#[test]
fn start_refreshes_configs_from_application_properties() {
    let props = InMemoryProperties::new().with("confscope.provider.p1.timeout", "250");
    let app = Arc::new(ApplicationScope::new(Arc::new(props)));
    let scope = ModuleScope::new(app);

    scope
        .add_provider(ProviderConfig::new().with_id("p1").with_parameter("timeout", "1000"))
        .unwrap();
    scope.start().unwrap();

    let provider = scope.get_provider("p1").unwrap();
    let provider = provider
        .as_any()
        .downcast_ref::<confscope_registry::ProviderConfig>()
        .unwrap();
    assert_eq!(provider.parameter("timeout"), Some("250".to_string()));
}
