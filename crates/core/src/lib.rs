//! Core domain types, errors, and constants for `confscope`.
//!
//! This crate establishes the foundational data structures and error handling
//! mechanisms used throughout the workspace. It aims to provide clear,
//! type-safe, and consistent building blocks.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all possible failure modes for predictable error handling.
//! - **`types`**: Contains the domain value types `ConfigKind` and
//!   `ServiceKey` that identify configuration entries and their logical
//!   targets.
//! - **`constants`**: A collection of shared, static constants such as
//!   property key names and key placeholders.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::{ConfigKind, ServiceKey},
};
