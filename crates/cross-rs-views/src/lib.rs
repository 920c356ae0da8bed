//! # cross-rs-views
//!
//! View layer for the cross-rs framework. A [`View`] renders action
//! templates inside layer templates, serializes JSON and XML displays, emits
//! script and stylesheet tags, and switches template directories for
//! crawlers and mobile browsers.
//!
//! ## Modules
//!
//! - [`view`] - Templates, layers, and display methods
//! - [`resources`] - Queued script and stylesheet resources
//! - [`agent`] - Crawler and mobile user agent detection
//! - [`xml`] - JSON value to XML conversion

pub mod agent;
pub mod resources;
pub mod view;
pub mod xml;

pub use view::View;
