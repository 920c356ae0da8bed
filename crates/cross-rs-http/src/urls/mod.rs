//! Link building and controller aliases.
//!
//! - [`alias`]: controller references and the alias table that maps internal
//!   controller and action names to their public names
//! - [`link`]: [`LinkBuilder`](link::LinkBuilder), which formats links in one
//!   of four URL styles
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use cross_rs_core::settings::UrlSettings;
//! use cross_rs_http::urls::alias::{AliasResolver, AliasTarget};
//! use cross_rs_http::urls::link::{LinkBuilder, LinkParams};
//! use indexmap::IndexMap;
//!
//! let mut table = IndexMap::new();
//! table.insert("main".to_string(), AliasTarget::Controller("hi".to_string()));
//! let aliases = Arc::new(AliasResolver::new(table).unwrap());
//!
//! let url = UrlSettings { url_type: 2, dot: "/".into(), ..UrlSettings::default() };
//! let builder = LinkBuilder::new(url, "http://example.com", aliases);
//!
//! let params = LinkParams::from([("page", 2)]);
//! assert_eq!(
//!     builder.link(Some("main"), Some(&params)).unwrap(),
//!     "http://example.com/index.php/hi?page=2"
//! );
//! ```

pub mod alias;
pub mod link;
