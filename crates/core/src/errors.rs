use crate::types::ConfigKind;

/// Result type alias for confscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for confscope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two non-equal interface-bound configs share a unique service key
    /// while duplicate tolerance is disabled
    #[error(
        "found multiple {kind} configs with unique service key [{unique_key}], \
         previous: {existing}, later: {incoming}. There can only be one instance \
         of a {kind} config with the same triple (group, interface, version). \
         If multiple instances are required for the same interface, please use \
         a different group or version"
    )]
    ConfigConflict {
        kind: ConfigKind,
        unique_key: String,
        existing: String,
        incoming: String,
    },

    /// A category-specific operation was invoked on a category that does not
    /// support it
    #[error("operation '{operation}' is not supported for {kind} configs: {message}")]
    InvalidCategory {
        kind: ConfigKind,
        operation: String,
        message: String,
    },

    /// A registration or transition was attempted on a stopped module scope
    #[error("module scope is stopped, cannot {operation}")]
    ScopeStopped { operation: String },

    /// An illegal module lifecycle transition was requested
    #[error("illegal module state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A deploy listener reported a failure; isolated during dispatch
    #[error("deploy listener '{listener}' failed: {message}")]
    Listener { listener: String, message: String },

    /// Property accessor and other configuration-level errors
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

// Helper methods for creating errors with context
impl Error {
    /// Create a conflict error between two configs sharing a unique key
    #[must_use]
    pub fn config_conflict(
        kind: ConfigKind,
        unique_key: impl Into<String>,
        existing: impl Into<String>,
        incoming: impl Into<String>,
    ) -> Self {
        Error::ConfigConflict {
            kind,
            unique_key: unique_key.into(),
            existing: existing.into(),
            incoming: incoming.into(),
        }
    }

    /// Create an invalid-category error
    #[must_use]
    pub fn invalid_category(
        kind: ConfigKind,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::InvalidCategory {
            kind,
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a stopped-scope error
    #[must_use]
    pub fn scope_stopped(operation: impl Into<String>) -> Self {
        Error::ScopeStopped {
            operation: operation.into(),
        }
    }

    /// Create an illegal-transition error
    #[must_use]
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Error::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a listener failure
    #[must_use]
    pub fn listener(listener: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Listener {
            listener: listener.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_both_configs_and_key() {
        let err = Error::config_conflict(
            ConfigKind::Service,
            "g/com.acme.CartService:1",
            "<service cart-a>",
            "<service cart-b>",
        );
        let msg = err.to_string();
        assert!(msg.contains("g/com.acme.CartService:1"));
        assert!(msg.contains("<service cart-a>"));
        assert!(msg.contains("<service cart-b>"));
        assert!(msg.contains("group, interface, version"));
    }

    #[test]
    fn test_scope_stopped_message() {
        let err = Error::scope_stopped("add service config");
        assert_eq!(
            err.to_string(),
            "module scope is stopped, cannot add service config"
        );
    }
}
