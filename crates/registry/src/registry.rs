//! The category-bucketed configuration store.

use crate::duplicate::{self, Resolution};
use crate::entry::ConfigRef;
use crate::lifecycle::OnceGate;
use confscope_core::{
    ConfigKind, Error, Result, ID_SEPARATOR, IGNORE_DUPLICATED_INTERFACE_KEY,
};
use confscope_props::PropertySource;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a registration attempt.
///
/// `duplicate` is true when an equivalent config was already registered; in
/// that case `config` is the previously registered instance, not the one
/// passed in. A duplicate outcome is a successful add, not an error.
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub config: ConfigRef,
    pub duplicate: bool,
}

/// Mutable registry state, guarded as a whole by one lock so that duplicate
/// checks, inserts, and `clear` are mutually atomic.
pub(crate) struct RegistryState {
    /// Primary store: category → insertion-ordered id → config.
    pub(crate) configs: HashMap<ConfigKind, IndexMap<String, ConfigRef>>,
    /// Side index over service configs, keyed by unique service key. Used
    /// only for duplicate detection; every value is also in `configs`.
    pub(crate) service_index: HashMap<String, ConfigRef>,
    /// Pointer addresses of incoming configs already warned about, so each
    /// distinct duplicate instance produces at most one warning.
    warned: HashSet<usize>,
    /// Per-category counters backing generated ids.
    ordinals: HashMap<ConfigKind, u64>,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            configs: HashMap::new(),
            service_index: HashMap::new(),
            warned: HashSet::new(),
            ordinals: HashMap::new(),
        }
    }

    /// Record that `config` triggered a duplicate warning. Returns true the
    /// first time a given instance is seen.
    pub(crate) fn mark_warned(&mut self, config: &ConfigRef) -> bool {
        self.warned.insert(Arc::as_ptr(config) as *const () as usize)
    }

    /// Deterministic id for a config registered without one: the category
    /// tag plus an insertion ordinal, e.g. `provider#0`.
    fn generate_id(&mut self, kind: ConfigKind) -> String {
        let ordinal = self.ordinals.entry(kind).or_insert(0);
        let id = format!("{}{}{}", kind.tag(), ID_SEPARATOR, ordinal);
        *ordinal += 1;
        id
    }
}

/// A per-module store of typed configuration objects.
///
/// All operations are safe to call from multiple threads without external
/// locking. `add` and `clear` are the only mutators; both take the write
/// lock, so a registration is either fully visible before a `clear` or fully
/// absent after it.
pub struct ConfigRegistry {
    state: RwLock<RegistryState>,
    gate: OnceGate,
    ignore_duplicated_interface: AtomicBool,
}

impl ConfigRegistry {
    /// Create an empty, uninitialized registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::new()),
            gate: OnceGate::new(),
            ignore_duplicated_interface: AtomicBool::new(false),
        }
    }

    /// Run one-time initialization, reading policy settings from `props`.
    ///
    /// Exactly one caller performs the property lookup, no matter how many
    /// threads call this concurrently or how often it is repeated; every
    /// other call returns immediately without waiting for the winner. A
    /// caller must not assume the policy is visible the instant its own call
    /// returns while the winner may still be running.
    ///
    /// `clear` does not re-arm this gate.
    pub fn initialize(&self, props: &dyn PropertySource) {
        if !self.gate.try_pass() {
            return;
        }
        let ignore = props.get_bool(IGNORE_DUPLICATED_INTERFACE_KEY).unwrap_or(false);
        self.ignore_duplicated_interface.store(ignore, Ordering::Release);
        info!(
            ignore_duplicated_interface = ignore,
            "config registry settings initialized"
        );
    }

    /// Whether `initialize` has been won by some caller.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.gate.is_passed()
    }

    /// Effective duplicate-interface tolerance.
    #[must_use]
    pub fn ignores_duplicated_interface(&self) -> bool {
        self.ignore_duplicated_interface.load(Ordering::Acquire)
    }

    /// Register a config.
    ///
    /// The duplicate policy for the config's category runs first; when it
    /// resolves to an equivalent prior entry, that entry is returned with
    /// `duplicate: true` and the store is untouched. The first registration
    /// for a given identity wins: under races, every losing call receives
    /// the winner back. An irreconcilable service-key conflict under strict
    /// policy is the only error path.
    pub fn add(&self, config: ConfigRef) -> Result<AddOutcome> {
        let ignore = self.ignores_duplicated_interface();
        let mut state = self.state.write();

        match duplicate::resolve(&mut state, &config, ignore)? {
            Resolution::Existing(existing) => Ok(AddOutcome {
                config: existing,
                duplicate: true,
            }),
            Resolution::New => {
                let kind = config.kind();
                let id = match config.id() {
                    Some(id) => id.to_string(),
                    None => state.generate_id(kind),
                };
                if kind == ConfigKind::Service {
                    if let Some(key) = config.service_key() {
                        state.service_index.insert(key.to_string(), Arc::clone(&config));
                    }
                }
                state
                    .configs
                    .entry(kind)
                    .or_default()
                    .insert(id.clone(), Arc::clone(&config));
                debug!(kind = %kind, id = %id, "registered config");
                Ok(AddOutcome {
                    config,
                    duplicate: false,
                })
            }
        }
    }

    /// Look up a config by category and id.
    #[must_use]
    pub fn get(&self, kind: ConfigKind, id: &str) -> Option<ConfigRef> {
        self.state.read().configs.get(&kind)?.get(id).cloned()
    }

    /// All configs of a category, in insertion order.
    #[must_use]
    pub fn get_all(&self, kind: ConfigKind) -> Vec<ConfigRef> {
        self.state
            .read()
            .configs
            .get(&kind)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default()
    }

    /// The default config of a single-default category: the first inserted
    /// entry that is default-eligible.
    ///
    /// Errors for multi-instance categories (service, reference), which have
    /// no notion of a default.
    pub fn get_default(&self, kind: ConfigKind) -> Result<Option<ConfigRef>> {
        if !kind.is_single_default() {
            return Err(Error::invalid_category(
                kind,
                "get_default",
                "only provider and consumer configs resolve a default",
            ));
        }
        Ok(self
            .state
            .read()
            .configs
            .get(&kind)
            .and_then(|entries| entries.values().find(|config| config.is_default()).cloned()))
    }

    /// Atomically drop every stored config, the service side index, and the
    /// warning bookkeeping.
    ///
    /// A cleared registry accepts further registrations; whether callers may
    /// still register is the owning scope's contract, not the registry's.
    /// The initialization gate stays passed and the policy keeps its value;
    /// a module generation is torn down, not re-initialized.
    pub fn clear(&self) {
        let mut state = self.state.write();
        *state = RegistryState::new();
        debug!("config registry cleared");
    }

    /// Refresh every stored config from `props`: providers and consumers
    /// first, then references and services.
    pub fn refresh_all(&self, props: &dyn PropertySource) {
        for kind in ConfigKind::ALL {
            // Snapshot before invoking config code so no lock is held
            // across refresh callbacks.
            for config in self.get_all(kind) {
                config.refresh(props);
            }
        }
    }

    /// Total number of stored configs, across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .read()
            .configs
            .values()
            .map(IndexMap::len)
            .sum()
    }

    /// Whether the registry holds no configs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigRegistry")
            .field("len", &self.len())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
