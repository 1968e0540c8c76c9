/// Constants used throughout the confscope codebase
// Property keys consulted during registry initialization
pub const IGNORE_DUPLICATED_INTERFACE_KEY: &str = "confscope.config.ignore-duplicated-interface";

// Prefix under which config parameters are looked up on refresh,
// e.g. `confscope.provider.p1.timeout`
pub const CONFIG_PROPERTY_PREFIX: &str = "confscope";

// Placeholder substituted for an empty group or version in a service key
pub const KEY_PLACEHOLDER: &str = "-";

// Separator between group and interface in a service key
pub const GROUP_SEPARATOR: &str = "/";

// Separator between interface and version in a service key
pub const VERSION_SEPARATOR: &str = ":";

// Separator used when assigning ids to configs registered without one,
// e.g. `provider#0`
pub const ID_SEPARATOR: &str = "#";
