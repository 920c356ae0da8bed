//! # cross-rs-http
//!
//! HTTP layer for the cross-rs framework. Provides link generation with
//! controller aliases, query string handling, MIME lookup, and the response
//! builder views render through.
//!
//! ## Modules
//!
//! - [`urls`] - Controller aliases and the link builder
//! - [`querydict`] - Insertion-ordered query string dictionary
//! - [`mime`] - File extension to MIME type table
//! - [`response`] - Status, content type, and header accumulation

pub mod mime;
pub mod querydict;
pub mod response;
pub mod urls;

pub use querydict::QueryDict;
pub use response::Response;
pub use urls::alias::{AliasResolver, ControllerRef};
pub use urls::link::{LinkBuilder, LinkParams, UrlType};
