//! The flat property lookup contract.

use tracing::warn;

/// A flat string-keyed property lookup.
///
/// Implementations are queried with dotted keys such as
/// `confscope.config.ignore-duplicated-interface` and return the raw string
/// value, if any. Sources must be shareable across threads; lookups are
/// expected to be cheap and side-effect free.
pub trait PropertySource: Send + Sync {
    /// Look up a property value by key.
    fn get_property(&self, key: &str) -> Option<String>;

    /// Look up a boolean property.
    ///
    /// Accepts `true`/`false` case-insensitively. Any other value is treated
    /// as absent, with a warning naming the key, so a typo never silently
    /// flips a policy.
    fn get_bool(&self, key: &str) -> Option<bool> {
        let raw = self.get_property(key)?;
        match raw.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                warn!(key, value = %raw, "ignoring unparseable boolean property");
                None
            }
        }
    }
}
