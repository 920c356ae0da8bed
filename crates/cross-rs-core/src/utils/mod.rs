//! Utility types for the cross-rs framework.
//!
//! - [`MultiValueDict`]: An insertion-ordered dictionary holding multiple values per key.

mod multi_value_dict;

pub use multi_value_dict::MultiValueDict;
