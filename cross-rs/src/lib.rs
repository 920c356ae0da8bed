//! # cross-rs
//!
//! A micro MVC web framework for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `cross-rs` to get the entire framework, or depend on
//! individual crates for finer-grained control.
//!
//! # Examples
//!
//! ```
//! use cross_rs::core::settings_loader;
//! use cross_rs::http::{LinkBuilder, LinkParams};
//!
//! let settings = settings_loader::from_toml_str(r#"
//!     [sys]
//!     site_url = "http://example.com"
//!
//!     [url]
//!     type = 2
//!     dot = "/"
//!
//!     [router]
//!     blog = "article"
//! "#).unwrap();
//!
//! let links = LinkBuilder::from_settings(&settings).unwrap();
//! let url = links.link(Some("article"), Some(&LinkParams::from([("p", 3)]))).unwrap();
//! assert_eq!(url, "http://example.com/index.php/blog?p=3");
//! ```

/// Settings, configuration access, signing, logging, and error types.
pub use cross_rs_core as core;

/// Link building, controller aliases, query strings, and responses.
#[cfg(feature = "http")]
pub use cross_rs_http as http;

/// Templates, layers, display methods, and resources.
#[cfg(feature = "views")]
pub use cross_rs_views as views;

pub use cross_rs_core::{CrossError, CrossResult, Settings};

// Third-party re-exports
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;
