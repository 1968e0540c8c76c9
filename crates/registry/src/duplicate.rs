//! Category-specific duplicate detection.
//!
//! Invoked on every registration, under the registry's write lock, so the
//! check and the subsequent insert form one atomic step. The first
//! registration for a given identity always wins; a later conflicting
//! registration is either rejected or discarded, never promoted.

use crate::entry::{same_instance, ConfigRef};
use crate::registry::RegistryState;
use confscope_core::{ConfigKind, Error, Result};
use std::sync::Arc;
use tracing::warn;

/// Outcome of duplicate resolution for an incoming config.
pub(crate) enum Resolution {
    /// No equivalent prior entry; proceed with insertion.
    New,
    /// An equivalent entry already exists; return it and leave the store
    /// untouched.
    Existing(ConfigRef),
}

/// Decide whether `incoming` collides with an already-registered config.
///
/// Policy by category:
/// - Service configs are checked against the unique-key side index.
/// - Reference configs are interface-bound but deliberately skip the side
///   index and dedup by identity/field equality only, like the generic
///   categories. Whether references should also collide by unique key is an
///   open product question; until answered, duplicated reference triples are
///   allowed.
/// - Provider and consumer configs dedup by id or field equality.
pub(crate) fn resolve(
    state: &mut RegistryState,
    incoming: &ConfigRef,
    ignore_duplicated_interface: bool,
) -> Result<Resolution> {
    match incoming.kind() {
        ConfigKind::Service => resolve_by_service_key(state, incoming, ignore_duplicated_interface),
        ConfigKind::Reference | ConfigKind::Provider | ConfigKind::Consumer => {
            Ok(resolve_by_equality(state, incoming))
        }
    }
}

fn resolve_by_service_key(
    state: &mut RegistryState,
    incoming: &ConfigRef,
    ignore_duplicated_interface: bool,
) -> Result<Resolution> {
    let Some(key) = incoming.service_key() else {
        return Ok(resolve_by_equality(state, incoming));
    };
    let key_string = key.to_string();

    let Some(existing) = state.service_index.get(&key_string).cloned() else {
        return Ok(Resolution::New);
    };

    // Idempotent re-registration of the very same instance.
    if same_instance(&existing, incoming) {
        return Ok(Resolution::Existing(existing));
    }

    if existing.eq_config(incoming.as_ref()) {
        if state.mark_warned(incoming) {
            warn!(
                unique_key = %key_string,
                config = %incoming,
                "ignoring duplicated and equal config"
            );
        }
        return Ok(Resolution::Existing(existing));
    }

    let conflict = Error::config_conflict(
        incoming.kind(),
        key_string.clone(),
        existing.to_string(),
        incoming.to_string(),
    );
    if state.mark_warned(incoming) {
        warn!(unique_key = %key_string, "{conflict}");
    }
    if ignore_duplicated_interface {
        Ok(Resolution::Existing(existing))
    } else {
        Err(conflict)
    }
}

fn resolve_by_equality(state: &RegistryState, incoming: &ConfigRef) -> Resolution {
    let Some(entries) = state.configs.get(&incoming.kind()) else {
        return Resolution::New;
    };

    if let Some(id) = incoming.id() {
        if let Some(existing) = entries.get(id) {
            return Resolution::Existing(Arc::clone(existing));
        }
    }

    for existing in entries.values() {
        if same_instance(existing, incoming) || existing.eq_config(incoming.as_ref()) {
            return Resolution::Existing(Arc::clone(existing));
        }
    }
    Resolution::New
}
