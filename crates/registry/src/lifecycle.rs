//! One-shot initialization gating and the module lifecycle state machine.

use confscope_core::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// A gate that lets exactly one caller through, ever.
///
/// Losers return immediately; they do not wait for the winner to finish
/// whatever work the gate protects. The gate cannot be re-armed.
#[derive(Debug, Default)]
pub struct OnceGate {
    passed: AtomicBool,
}

impl OnceGate {
    /// Create an unpassed gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to pass the gate.
    ///
    /// Returns true for exactly one caller across all threads; false for
    /// every other call, forever.
    pub fn try_pass(&self) -> bool {
        self.passed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether some caller has already passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.passed.load(Ordering::Acquire)
    }
}

/// Lifecycle states of a module scope.
///
/// The machine is linear: `Created → Initializing → Active → Stopping →
/// Stopped`. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Scope exists; nothing has run yet.
    Created,
    /// Registry initialization and config refresh in progress.
    Initializing,
    /// Module is serving; started notifications have fired.
    Active,
    /// Teardown in progress.
    Stopping,
    /// Terminal. The registry is cleared and rejects further registrations.
    Stopped,
}

impl ModuleState {
    /// Whether the machine permits moving from `self` to `next`.
    #[must_use]
    pub fn can_transition(self, next: ModuleState) -> bool {
        matches!(
            (self, next),
            (ModuleState::Created, ModuleState::Initializing)
                | (ModuleState::Initializing, ModuleState::Active)
                | (ModuleState::Active, ModuleState::Stopping)
                | (ModuleState::Stopping, ModuleState::Stopped)
        )
    }

    /// Validate a transition, producing the error callers propagate.
    pub fn checked_transition(self, next: ModuleState) -> Result<ModuleState> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(Error::invalid_transition(self.to_string(), next.to_string()))
        }
    }
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleState::Created => "created",
            ModuleState::Initializing => "initializing",
            ModuleState::Active => "active",
            ModuleState::Stopping => "stopping",
            ModuleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_gate_passes_exactly_once() {
        let gate = OnceGate::new();
        assert!(!gate.is_passed());
        assert!(gate.try_pass());
        assert!(!gate.try_pass());
        assert!(gate.is_passed());
    }

    #[test]
    fn test_gate_has_single_winner_across_threads() {
        let gate = Arc::new(OnceGate::new());
        let winners = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            for _ in 0..16 {
                let gate = Arc::clone(&gate);
                let winners = Arc::clone(&winners);
                scope.spawn(move || {
                    if gate.try_pass() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_linear_transitions_are_permitted() {
        assert!(ModuleState::Created.can_transition(ModuleState::Initializing));
        assert!(ModuleState::Initializing.can_transition(ModuleState::Active));
        assert!(ModuleState::Active.can_transition(ModuleState::Stopping));
        assert!(ModuleState::Stopping.can_transition(ModuleState::Stopped));
    }

    #[test]
    fn test_stopped_is_terminal_and_skips_are_rejected() {
        assert!(!ModuleState::Stopped.can_transition(ModuleState::Initializing));
        assert!(!ModuleState::Stopped.can_transition(ModuleState::Active));
        assert!(!ModuleState::Created.can_transition(ModuleState::Active));
        assert!(!ModuleState::Active.can_transition(ModuleState::Stopped));
        assert!(ModuleState::Created
            .checked_transition(ModuleState::Active)
            .is_err());
    }
}
