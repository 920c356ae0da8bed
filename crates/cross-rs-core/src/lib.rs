//! # cross-rs-core
//!
//! Core types, settings, configuration access, and error types for the
//! cross-rs framework. This crate has no HTTP dependencies and provides the
//! foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Typed framework settings (`sys`, `url`, `router`)
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`config_array`] - Raw section/key access to configuration documents
//! - [`signing`] - HMAC signing and secured link parameters
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Utility types (`MultiValueDict`)

pub mod config_array;
pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod signing;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use config_array::ConfigArray;
pub use error::{CrossError, CrossResult};
pub use settings::{Settings, SETTINGS};
